//! JSON syntax documents.
//!
//! The external frontend serializes each parsed source file (syntax tree
//! plus annotations) as JSON. Reading applies the parse options: every
//! preprocessor region is replaced by the branch its condition selects.

use crate::decl::Member;
use crate::node::Document;
use crate::traits::{ParseOptions, ReadError, Reader};

/// Static instance of the JSON reader for registry.
pub static JSON_READER: JsonReader = JsonReader;

/// JSON reader implementing the Reader trait.
pub struct JsonReader;

impl Reader for JsonReader {
    fn language(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn read(&self, source: &str, options: &ParseOptions) -> Result<Document, ReadError> {
        read_json(source, options)
    }
}

/// Parse a JSON syntax document and resolve its preprocessor regions.
pub fn read_json(source: &str, options: &ParseOptions) -> Result<Document, ReadError> {
    let mut document: Document = serde_json::from_str(source)?;
    document.members = resolve_regions(document.members, options)?;
    Ok(document)
}

/// Flatten regions into the members of their selected branch.
pub fn resolve_regions(
    members: Vec<Member>,
    options: &ParseOptions,
) -> Result<Vec<Member>, ReadError> {
    let mut out = Vec::with_capacity(members.len());
    for member in members {
        match member {
            Member::Region(region) => {
                if region.symbol.trim().trim_start_matches('!').is_empty() {
                    return Err(ReadError::UnexpectedNode {
                        expected: "region symbol".into(),
                        got: format!("{:?}", region.symbol),
                    });
                }
                let branch = if options.evaluate(&region.symbol) {
                    region.then
                } else {
                    region.otherwise
                };
                out.extend(resolve_regions(branch, options)?);
            }
            Member::Namespace(mut ns) => {
                ns.members = resolve_regions(ns.members, options)?;
                out.push(Member::Namespace(ns));
            }
            Member::Type(mut ty) => {
                ty.members = resolve_regions(ty.members, options)?;
                out.push(Member::Type(ty));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "name": "Shapes.cs",
        "members": [
            {"kind": "namespace", "name": "Shapes", "members": [
                {"kind": "region", "symbol": "TYPESCRIPT",
                 "then": [{"kind": "type", "keyword": "class", "name": "Web"}],
                 "otherwise": [{"kind": "type", "keyword": "class", "name": "Native"}]},
                {"kind": "type", "keyword": "interface", "name": "IShape", "members": [
                    {"kind": "region", "symbol": "!TYPESCRIPT",
                     "then": [{"kind": "method", "name": "Handle",
                               "returns": {"kind": "predefined", "name": "void"}}]}
                ]}
            ]}
        ]
    }"#;

    fn type_names(members: &[Member]) -> Vec<String> {
        let mut names = Vec::new();
        for member in members {
            match member {
                Member::Namespace(ns) => names.extend(type_names(&ns.members)),
                Member::Type(ty) => names.push(ty.name.clone()),
                _ => {}
            }
        }
        names
    }

    #[test]
    fn defined_symbol_selects_then_branch() {
        let mut options = ParseOptions::new();
        options.define("TYPESCRIPT");
        let doc = read_json(DOC, &options).unwrap();
        assert_eq!(type_names(&doc.members), vec!["Web", "IShape"]);

        let Member::Namespace(ns) = &doc.members[0] else {
            panic!("expected namespace");
        };
        let Member::Type(shape) = &ns.members[1] else {
            panic!("expected type");
        };
        assert!(shape.members.is_empty());
    }

    #[test]
    fn undefined_symbol_selects_otherwise_branch() {
        let doc = read_json(DOC, &ParseOptions::new()).unwrap();
        assert_eq!(type_names(&doc.members), vec!["Native", "IShape"]);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = read_json(r#"{"name": 3}"#, &ParseOptions::new()).unwrap_err();
        assert!(matches!(err, ReadError::Json(_)));
    }

    #[test]
    fn empty_region_symbol_is_rejected() {
        let err = read_json(
            r#"{"name": "a", "members": [{"kind": "region", "symbol": " "}]}"#,
            &ParseOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ReadError::UnexpectedNode { .. }));
    }
}
