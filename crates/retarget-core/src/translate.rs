//! Pipeline plus writer: documents in, one output file per class out.

use crate::config::RetargetConfig;
use crate::error::PipelineError;
use crate::lower::LoweringEngine;
use crate::pipeline::{Pipeline, Session};
use crate::traits::Writer;
use retarget_model::Program;
use std::path::PathBuf;

/// A generated source file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

pub struct Translator<'w> {
    writer: &'w dyn Writer,
    config: RetargetConfig,
}

impl<'w> Translator<'w> {
    pub fn new(writer: &'w dyn Writer, config: RetargetConfig) -> Self {
        Self { writer, config }
    }

    pub fn writer(&self) -> &'w dyn Writer {
        self.writer
    }

    /// A session wired with the writer's tables and the configured
    /// overrides. Add sources before calling [`Translator::translate`].
    pub fn session(&self) -> Session {
        let program = Program::new(
            self.config.rules.clone(),
            self.config.type_map(self.writer.primitive_types()),
        );
        let mut session = Session::new(program);
        session.known = self.config.known(self.writer.known_classes());
        session.symbols = self
            .writer
            .preprocessor_symbols()
            .iter()
            .map(|s| s.to_string())
            .chain(self.config.parse.preprocessor_symbols.iter().cloned())
            .collect();
        session
    }

    /// Run the standard pipeline and write every class. Referenced classes
    /// found while writing are recorded on the program.
    #[tracing::instrument(level = "debug", skip_all, fields(target = self.writer.language()))]
    pub fn translate(&self, session: &mut Session) -> Result<Vec<OutputFile>, PipelineError> {
        Pipeline::standard().run(session)?;

        let mut files = Vec::with_capacity(session.program.len());
        let mut references = Vec::with_capacity(session.program.len());
        {
            let engine =
                LoweringEngine::new(&session.program, self.writer.renderer(), &session.known);
            for id in session.program.class_ids() {
                let class = session.program.class(id);
                let output = self.writer.write_class(&engine, id)?;
                files.push(OutputFile {
                    path: PathBuf::from(format!("{}.{}", class.name, self.writer.extension())),
                    contents: output.contents,
                });
                references.push((id, output.referenced_classes));
            }
        }

        for (id, names) in references {
            let class = session.program.class_mut(id);
            for name in names {
                class.add_reference(&name);
            }
        }
        tracing::debug!(files = files.len(), "translation complete");
        Ok(files)
    }
}
