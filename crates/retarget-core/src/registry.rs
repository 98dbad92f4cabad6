//! Registry for target writers.

use crate::traits::Writer;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Global writer registry.
static WRITERS: RwLock<Vec<&'static dyn Writer>> = RwLock::new(Vec::new());
static WRITERS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom writer. A writer for a language that is already
/// registered, built-in or not, is replaced.
pub fn register_writer(writer: &'static dyn Writer) {
    init_writers();
    let mut writers = WRITERS.write().unwrap_or_else(PoisonError::into_inner);
    match writers.iter().position(|w| w.language() == writer.language()) {
        Some(index) => {
            tracing::debug!(language = writer.language(), "replacing registered writer");
            writers[index] = writer;
        }
        None => writers.push(writer),
    }
}

fn init_writers() {
    WRITERS_INITIALIZED.get_or_init(|| {
        #[cfg(feature = "write-typescript")]
        {
            WRITERS
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(&crate::output::typescript::TYPESCRIPT_WRITER);
        }
    });
}

/// Get a writer by language name.
pub fn writer_for_language(lang: &str) -> Option<&'static dyn Writer> {
    init_writers();
    WRITERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .find(|w| w.language() == lang)
        .copied()
}

/// Get all registered writers.
pub fn writers() -> Vec<&'static dyn Writer> {
    init_writers();
    WRITERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "write-typescript")]
    fn typescript_writer_lookup() {
        let writer = writer_for_language("typescript").expect("typescript writer");
        assert_eq!(writer.language(), "typescript");
        assert_eq!(writer.extension(), "ts");
    }

    #[test]
    fn unknown_language_has_no_writer() {
        assert!(writer_for_language("cobol").is_none());
    }

    #[cfg(feature = "write-typescript")]
    struct Alias {
        extension: &'static str,
    }

    #[cfg(feature = "write-typescript")]
    impl Writer for Alias {
        fn language(&self) -> &'static str {
            "typescript-alias"
        }

        fn extension(&self) -> &'static str {
            self.extension
        }

        fn primitive_types(&self) -> retarget_model::TypeMap {
            crate::output::TYPESCRIPT_WRITER.primitive_types()
        }

        fn renderer(&self) -> &dyn crate::render::Renderer {
            crate::output::TYPESCRIPT_WRITER.renderer()
        }

        fn write_class(
            &self,
            engine: &crate::lower::LoweringEngine<'_>,
            class: retarget_model::ClassId,
        ) -> Result<crate::traits::ClassOutput, crate::error::LowerError> {
            crate::output::TYPESCRIPT_WRITER.write_class(engine, class)
        }
    }

    #[test]
    #[cfg(feature = "write-typescript")]
    fn same_language_replaces_earlier_writer() {
        static FIRST: Alias = Alias { extension: "a.ts" };
        static SECOND: Alias = Alias { extension: "b.ts" };
        register_writer(&FIRST);
        register_writer(&SECOND);

        let matching = writers()
            .iter()
            .filter(|w| w.language() == "typescript-alias")
            .count();
        assert_eq!(matching, 1);
        let writer = writer_for_language("typescript-alias").unwrap();
        assert_eq!(writer.extension(), "b.ts");
    }

    #[test]
    #[cfg(feature = "write-typescript")]
    fn writers_lists_builtin_once() {
        let builtin = writers()
            .iter()
            .filter(|w| w.language() == "typescript")
            .count();
        assert_eq!(builtin, 1);
    }
}
