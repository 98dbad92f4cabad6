//! End-to-end translation to TypeScript.
//!
//! Documents go in as JSON text, whole files come out. Expected output is
//! compared line for line.

use pretty_assertions::assert_eq;
use retarget_core::{
    LowerError, OutputFile, PipelineError, RetargetConfig, TYPESCRIPT_WRITER, TextSource,
    Translator,
};
use retarget_syntax::JSON_READER;

fn translate(documents: &[(&str, &str)]) -> Result<Vec<OutputFile>, PipelineError> {
    translate_with(RetargetConfig::default(), documents)
}

fn translate_with(
    config: RetargetConfig,
    documents: &[(&str, &str)],
) -> Result<Vec<OutputFile>, PipelineError> {
    let translator = Translator::new(&TYPESCRIPT_WRITER, config);
    let mut session = translator.session();
    for (name, text) in documents {
        session.add_source(TextSource::new(*name, *text, &JSON_READER));
    }
    translator.translate(&mut session)
}

fn file<'a>(files: &'a [OutputFile], path: &str) -> &'a str {
    files
        .iter()
        .find(|f| f.path.to_str() == Some(path))
        .map(|f| f.contents.as_str())
        .unwrap_or_else(|| panic!("no output file {path}"))
}

fn paths(files: &[OutputFile]) -> Vec<String> {
    files.iter().map(|f| f.path.display().to_string()).collect()
}

const COUNTER: &str = r#"{
    "name": "Counter.cs",
    "members": [
        {"kind": "type", "keyword": "class", "name": "Counter", "modifiers": ["public"], "members": [
            {"kind": "field", "modifiers": ["private"], "ty": {"kind": "predefined", "name": "int"},
             "declarators": [{"name": "count", "init": {"kind": "literal", "literal": "numeric", "text": "0"}}]},
            {"kind": "property", "modifiers": ["public"], "ty": {"kind": "predefined", "name": "int"},
             "name": "Count",
             "accessors": [{"kind": "get", "body": {"kind": "block", "statements": [
                {"kind": "return", "value": {"kind": "identifier", "name": "count"}}
             ]}}]},
            {"kind": "method", "name": "Add", "modifiers": ["public"],
             "returns": {"kind": "predefined", "name": "void"},
             "params": [{"name": "amount", "ty": {"kind": "predefined", "name": "int"}}],
             "body": {"kind": "block", "statements": [
                {"kind": "expression", "expr": {"kind": "assignment", "op": "add",
                    "target": {"kind": "identifier", "name": "count"},
                    "value": {"kind": "identifier", "name": "amount"}}}
             ]}}
        ]}
    ]
}"#;

#[test]
fn class_with_field_property_and_method() {
    let files = translate(&[("Counter.json", COUNTER)]).unwrap();

    assert_eq!(paths(&files), vec!["Counter.ts"]);
    assert_eq!(
        file(&files, "Counter.ts"),
        "\
export class Counter {
  public get Count(): number {
    return this.count;
  }
  private count: number = 0;

  public Add(amount: number): void {
    this.count += amount;
  }
}
"
    );
}

const PALETTE: &str = r#"{
    "name": "Palette.cs",
    "members": [
        {"kind": "type", "keyword": "class", "name": "Palette", "modifiers": ["public"], "members": [
            {"kind": "field", "modifiers": ["public"], "ty": {"kind": "named", "name": "Color"},
             "declarators": [{"name": "Tint"}]}
        ]}
    ]
}"#;

const COLOR: &str = r#"{
    "name": "Color.cs",
    "members": [
        {"kind": "type", "keyword": "enum", "name": "Color", "members": [
            {"kind": "enum_member", "name": "Red"},
            {"kind": "enum_member", "name": "Green", "value": "4"}
        ]}
    ]
}"#;

#[test]
fn referenced_classes_are_imported() {
    let translator = Translator::new(&TYPESCRIPT_WRITER, RetargetConfig::default());
    let mut session = translator.session();
    session.add_source(TextSource::new("Palette.json", PALETTE, &JSON_READER));
    session.add_source(TextSource::new("Color.json", COLOR, &JSON_READER));
    let files = translator.translate(&mut session).unwrap();

    // Enums sort ahead of plain classes.
    assert_eq!(paths(&files), vec!["Color.ts", "Palette.ts"]);
    assert_eq!(
        file(&files, "Color.ts"),
        "\
export enum Color {
  Red,
  Green = 4,
}
"
    );
    assert_eq!(
        file(&files, "Palette.ts"),
        "\
import { Color } from \"./Color\";

export class Palette {
  public Tint: Color;
}
"
    );

    let palette = session.program.find_class("Palette").unwrap();
    assert_eq!(
        session.program.class(palette).referenced_classes,
        vec!["Color".to_string()]
    );
}

const OUT_PARAMS: &str = r#"{
    "name": "C.cs",
    "members": [
        {"kind": "type", "keyword": "class", "name": "C", "members": [
            {"kind": "method", "name": "Foo",
             "returns": {"kind": "predefined", "name": "void"},
             "params": [{"name": "v", "ty": {"kind": "predefined", "name": "int"}, "modifiers": ["out"]}],
             "body": {"kind": "block", "statements": [
                {"kind": "expression", "expr": {"kind": "assignment",
                    "target": {"kind": "identifier", "name": "v"},
                    "value": {"kind": "literal", "literal": "numeric", "text": "5"}}}
             ]}},
            {"kind": "method", "name": "Run", "modifiers": ["public"],
             "returns": {"kind": "predefined", "name": "void"},
             "body": {"kind": "block", "statements": [
                {"kind": "local_declaration", "declaration": {
                    "ty": {"kind": "predefined", "name": "int"},
                    "declarators": [{"name": "x", "init": {"kind": "literal", "literal": "numeric", "text": "1"}}]}},
                {"kind": "expression", "expr": {"kind": "invocation",
                    "target": {"kind": "identifier", "name": "Foo"},
                    "args": [{"modifier": "out", "expr": {"kind": "identifier", "name": "x"}}]}}
             ]}}
        ]}
    ]
}"#;

#[test]
fn out_arguments_travel_in_boxes() {
    let files = translate(&[("C.json", OUT_PARAMS)]).unwrap();

    assert_eq!(
        file(&files, "C.ts"),
        "\
export class C {
  public Run(): void {
    let x: number = 1;
    const out_1: { value: any } = { value: undefined };
    this.Foo(out_1);
    x = out_1.value;
  }

  private Foo(v: { value: number }): void {
    v.value = 5;
  }
}
"
    );
}

const PLATFORM: &str = r#"{
    "name": "Platform.cs",
    "members": [
        {"kind": "region", "symbol": "TYPESCRIPT",
         "then": [{"kind": "type", "keyword": "class", "name": "Web"}],
         "otherwise": [{"kind": "type", "keyword": "class", "name": "Desktop"}]},
        {"kind": "region", "symbol": "STEAM",
         "then": [{"kind": "type", "keyword": "class", "name": "Achievements"}]}
    ]
}"#;

#[test]
fn target_symbol_selects_region_branch() {
    let files = translate(&[("Platform.json", PLATFORM)]).unwrap();
    assert_eq!(paths(&files), vec!["Web.ts"]);
}

#[test]
fn configured_symbols_add_to_target_symbols() {
    let mut config = RetargetConfig::default();
    config.parse.preprocessor_symbols.push("STEAM".into());

    let files = translate_with(config, &[("Platform.json", PLATFORM)]).unwrap();
    assert_eq!(paths(&files), vec!["Achievements.ts", "Web.ts"]);
}

#[test]
fn ignored_classes_produce_no_file() {
    let mut config = RetargetConfig::default();
    config.rules.ignored_classes.push("Palette".into());

    let files = translate_with(config, &[("Palette.json", PALETTE), ("Color.json", COLOR)]).unwrap();
    assert_eq!(paths(&files), vec!["Color.ts"]);
}

#[test]
fn unsupported_statement_stops_translation() {
    let doc = r#"{
        "name": "Jump.cs",
        "members": [
            {"kind": "type", "keyword": "class", "name": "Jump", "members": [
                {"kind": "method", "name": "Go", "returns": {"kind": "predefined", "name": "void"},
                 "body": {"kind": "block", "statements": [
                    {"kind": "other", "syntax": "goto_statement"}
                 ]}}
            ]}
        ]
    }"#;
    let err = translate(&[("Jump.json", doc)]).unwrap_err();

    match err {
        PipelineError::Lower(LowerError::Unsupported { kind, context, .. }) => {
            assert_eq!(kind, "goto_statement");
            assert_eq!(context, "Jump.Go");
        }
        other => panic!("unexpected error: {other}"),
    }
}
