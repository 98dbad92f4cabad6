//! Name filters and redirects applied while building the program.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ignored-namespace and ignored-class filters (substring matches), plus
/// static-member redirects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub ignored_namespaces: Vec<String>,
    pub ignored_classes: Vec<String>,
    /// Class name -> class that static member access is redirected to.
    pub static_redirects: BTreeMap<String, String>,
}

impl Rules {
    pub fn ignores_namespace(&self, name: &str) -> bool {
        self.ignored_namespaces
            .iter()
            .any(|pattern| !pattern.is_empty() && name.contains(pattern.as_str()))
    }

    pub fn ignores_class(&self, name: &str) -> bool {
        self.ignored_classes
            .iter()
            .any(|pattern| !pattern.is_empty() && name.contains(pattern.as_str()))
    }

    /// Union with `other`; `other` wins on redirect conflicts.
    pub fn merge(mut self, other: Rules) -> Rules {
        for ns in other.ignored_namespaces {
            if !self.ignored_namespaces.contains(&ns) {
                self.ignored_namespaces.push(ns);
            }
        }
        for class in other.ignored_classes {
            if !self.ignored_classes.contains(&class) {
                self.ignored_classes.push(class);
            }
        }
        self.static_redirects.extend(other.static_redirects);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_matching() {
        let rules = Rules {
            ignored_namespaces: vec!["Tests".into()],
            ignored_classes: vec!["Benchmark".into(), String::new()],
            ..Rules::default()
        };
        assert!(rules.ignores_namespace("Game.Tests.Unit"));
        assert!(!rules.ignores_namespace("Game.Core"));
        assert!(rules.ignores_class("PathBenchmarks"));
        // Empty patterns never match everything.
        assert!(!rules.ignores_class("Player"));
    }

    #[test]
    fn merge_unions_lists() {
        let a = Rules {
            ignored_classes: vec!["A".into()],
            ..Rules::default()
        };
        let b = Rules {
            ignored_classes: vec!["A".into(), "B".into()],
            ..Rules::default()
        };
        assert_eq!(a.merge(b).ignored_classes, vec!["A", "B"]);
    }
}
