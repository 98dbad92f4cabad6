//! Traits for source readers.

use crate::node::Document;
use std::collections::BTreeSet;

/// Error that can occur when reading a source document.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid syntax document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported syntax: {0}")]
    Unsupported(String),

    #[error("expected {expected}, got {got}")]
    UnexpectedNode { expected: String, got: String },
}

/// Parse configuration handed to readers.
///
/// Preprocessor symbols are compared case-sensitively after trimming;
/// empty names are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    preprocessor_symbols: BTreeSet<String>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a symbol. Returns false if it was empty or already defined.
    pub fn define(&mut self, symbol: &str) -> bool {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return false;
        }
        self.preprocessor_symbols.insert(symbol.to_string())
    }

    pub fn is_defined(&self, symbol: &str) -> bool {
        self.preprocessor_symbols.contains(symbol.trim())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.preprocessor_symbols.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.preprocessor_symbols.clear();
    }

    /// Evaluate a region condition: `SYMBOL` or `!SYMBOL`.
    pub fn evaluate(&self, condition: &str) -> bool {
        match condition.trim().strip_prefix('!') {
            Some(negated) => !self.is_defined(negated),
            None => self.is_defined(condition),
        }
    }
}

/// A reader turns source text into a [`Document`].
pub trait Reader: Send + Sync {
    /// Format identifier (e.g., "json").
    fn language(&self) -> &'static str;

    /// File extensions this reader handles (e.g., &["json"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse source text, honoring the preprocessor symbols in `options`.
    fn read(&self, source: &str, options: &ParseOptions) -> Result<Document, ReadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_trims_and_dedupes() {
        let mut options = ParseOptions::new();
        assert!(options.define(" DEBUG "));
        assert!(!options.define("DEBUG"));
        assert!(!options.define("   "));
        assert_eq!(options.symbols().collect::<Vec<_>>(), vec!["DEBUG"]);
    }

    #[test]
    fn evaluate_negation() {
        let mut options = ParseOptions::new();
        options.define("TYPESCRIPT");
        assert!(options.evaluate("TYPESCRIPT"));
        assert!(!options.evaluate("!TYPESCRIPT"));
        assert!(options.evaluate("!GO"));
    }
}
