//! Stage pipeline over a shared session.
//!
//! A translation unit runs a fixed stage list once:
//!
//! ```text
//! reset -> fold-symbols -> discover -> resolve -> sort
//! ```
//!
//! Each stage finishes for every document before the next starts, since
//! resolution needs the complete class registry. Stage prerequisites are
//! checked over the whole list before anything runs.

use crate::discovery::{DiscoveryStats, SourceUnit, discover};
use crate::error::PipelineError;
use crate::order::sort_program;
use crate::resolve::resolve_program;
use retarget_model::{KnownClasses, Program};
use retarget_syntax::{Document, ParseOptions, ReadError, Reader};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Something that yields one source document.
pub trait DocumentSource: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Produce the document with the session's parse options applied.
    fn load(&self, options: &ParseOptions) -> Result<SourceUnit, ReadError>;
}

/// An already-parsed document.
impl DocumentSource for Document {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, _options: &ParseOptions) -> Result<SourceUnit, ReadError> {
        Ok(SourceUnit::from(self.clone()))
    }
}

/// Document text read through a registered [`Reader`] when the pipeline
/// runs, so regions see the folded preprocessor symbols.
pub struct TextSource {
    pub name: String,
    pub text: String,
    pub reader: &'static dyn Reader,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>, reader: &'static dyn Reader) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            reader,
        }
    }
}

impl DocumentSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, options: &ParseOptions) -> Result<SourceUnit, ReadError> {
        let mut document = self.reader.read(&self.text, options)?;
        if document.name.is_empty() {
            document.name = self.name.clone();
        }
        Ok(SourceUnit::from(document))
    }
}

/// State shared by every stage of one run.
pub struct Session {
    pub program: Program,
    pub options: ParseOptions,
    /// External feature flags folded into `options` by [`FoldSymbols`].
    pub symbols: Vec<String>,
    pub known: KnownClasses,
    pub sources: Vec<Box<dyn DocumentSource>>,
    /// Free-form per-run data; stages record their stats here.
    pub extensions: BTreeMap<String, serde_json::Value>,
    completed: Vec<&'static str>,
}

impl Session {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            options: ParseOptions::new(),
            symbols: Vec::new(),
            known: KnownClasses::new(),
            sources: Vec::new(),
            extensions: BTreeMap::new(),
            completed: Vec::new(),
        }
    }

    pub fn add_source(&mut self, source: impl DocumentSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Stages that have finished, in run order.
    pub fn completed(&self) -> &[&'static str] {
        &self.completed
    }

    pub fn has_completed(&self, stage: &str) -> bool {
        self.completed.iter().any(|s| *s == stage)
    }
}

/// One step of the pipeline.
pub trait Stage {
    /// Name of this stage (for prerequisites and logging).
    fn name(&self) -> &'static str;

    /// Names of stages that must run before this one.
    fn requires(&self) -> &[&'static str] {
        &[]
    }

    fn run(&self, session: &mut Session) -> Result<(), PipelineError>;
}

/// Clear residual program state from an earlier run.
pub struct Reset;

impl Stage for Reset {
    fn name(&self) -> &'static str {
        "reset"
    }

    fn run(&self, session: &mut Session) -> Result<(), PipelineError> {
        session.program.reset();
        session.completed.clear();
        session.extensions.clear();
        Ok(())
    }
}

/// Fold external feature flags into the parse options.
pub struct FoldSymbols;

impl Stage for FoldSymbols {
    fn name(&self) -> &'static str {
        "fold-symbols"
    }

    fn run(&self, session: &mut Session) -> Result<(), PipelineError> {
        for symbol in &session.symbols {
            session.options.define(symbol);
        }
        Ok(())
    }
}

/// Discovery over every document.
pub struct Discover;

impl Stage for Discover {
    fn name(&self) -> &'static str {
        "discover"
    }

    fn requires(&self) -> &[&'static str] {
        &["fold-symbols"]
    }

    fn run(&self, session: &mut Session) -> Result<(), PipelineError> {
        let mut stats = DiscoveryStats::default();
        for source in &session.sources {
            let unit = source
                .load(&session.options)
                .map_err(|source_err| PipelineError::Read {
                    document: source.name().to_string(),
                    source: source_err,
                })?;
            stats += discover(&mut session.program, unit)?;
        }
        session.extensions.insert(
            "discovery".to_string(),
            serde_json::json!({
                "documents": session.sources.len(),
                "classes": stats.classes,
                "skipped_namespaces": stats.skipped_namespaces,
                "skipped_classes": stats.skipped_classes,
                "skipped_members": stats.skipped_members,
            }),
        );
        Ok(())
    }
}

/// Conflict resolution over the complete program.
pub struct Resolve;

impl Stage for Resolve {
    fn name(&self) -> &'static str {
        "resolve"
    }

    fn requires(&self) -> &[&'static str] {
        &["discover"]
    }

    fn run(&self, session: &mut Session) -> Result<(), PipelineError> {
        let stats = resolve_program(&mut session.program);
        session.extensions.insert(
            "resolution".to_string(),
            serde_json::json!({ "classes": stats.classes, "renamed": stats.renamed }),
        );
        Ok(())
    }
}

/// Final deterministic sort; freezes the program.
pub struct Sort;

impl Stage for Sort {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn requires(&self) -> &[&'static str] {
        &["resolve"]
    }

    fn run(&self, session: &mut Session) -> Result<(), PipelineError> {
        sort_program(&mut session.program);
        Ok(())
    }
}

/// Timing of one finished stage.
#[derive(Debug, Clone)]
pub struct StageTiming {
    pub stage: &'static str,
    pub duration: Duration,
}

/// Ordered stage list.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// reset, fold-symbols, discover, resolve, sort.
    pub fn standard() -> Self {
        Self::new()
            .with(Reset)
            .with(FoldSymbols)
            .with(Discover)
            .with(Resolve)
            .with(Sort)
    }

    pub fn with(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Check every prerequisite without running anything. Stages already
    /// completed in the session count, unless the list begins with a reset.
    pub fn validate(&self, session: &Session) -> Result<(), PipelineError> {
        let Some(first) = self.stages.first() else {
            return Err(PipelineError::EmptyPipeline);
        };
        let mut done: Vec<&str> = if first.name() == Reset.name() {
            Vec::new()
        } else {
            session.completed.to_vec()
        };
        for stage in &self.stages {
            if let Some(missing) = stage.requires().iter().find(|r| !done.contains(r)) {
                return Err(PipelineError::MissingPrerequisite {
                    stage: stage.name(),
                    requires: *missing,
                });
            }
            done.push(stage.name());
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(stages = self.stages.len()))]
    pub fn run(&self, session: &mut Session) -> Result<Vec<StageTiming>, PipelineError> {
        self.validate(session)?;
        let mut timings = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let start = Instant::now();
            stage.run(session)?;
            let duration = start.elapsed();
            session.completed.push(stage.name());
            tracing::debug!(stage = stage.name(), ?duration, "stage complete");
            timings.push(StageTiming {
                stage: stage.name(),
                duration,
            });
        }
        Ok(timings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retarget_model::Rules;
    use retarget_syntax::{Member, NamespaceDecl, TypeDecl};

    fn session_with(members: Vec<Member>) -> Session {
        let mut session = Session::new(Program::default());
        session.add_source(Document::new("a.cs", members));
        session
    }

    #[test]
    fn empty_pipeline_fails_before_running() {
        let mut session = session_with(vec![Member::Type(TypeDecl::class("A"))]);
        let err = Pipeline::new().run(&mut session).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyPipeline));
        assert!(session.completed().is_empty());
    }

    #[test]
    fn missing_prerequisite_fails_before_any_stage() {
        let mut session = session_with(vec![Member::Type(TypeDecl::class("A"))]);
        let pipeline = Pipeline::new().with(FoldSymbols).with(Discover).with(Sort);
        let err = pipeline.run(&mut session).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingPrerequisite {
                stage: "sort",
                requires: "resolve"
            }
        ));
        assert!(session.program.is_empty());
    }

    #[test]
    fn standard_pipeline_runs_every_stage() {
        let mut session = session_with(vec![
            Member::Type(TypeDecl::class("B")),
            Member::Type(TypeDecl::class("A")),
        ]);
        let timings = Pipeline::standard().run(&mut session).unwrap();
        let names: Vec<_> = timings.iter().map(|t| t.stage).collect();
        assert_eq!(names, vec!["reset", "fold-symbols", "discover", "resolve", "sort"]);
        assert!(session.program.is_frozen());
        let names: Vec<_> = session.program.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(session.extensions["discovery"]["classes"], 2);
    }

    #[test]
    fn rerun_resets_previous_program() {
        let mut session = session_with(vec![Member::Type(TypeDecl::class("A"))]);
        Pipeline::standard().run(&mut session).unwrap();
        Pipeline::standard().run(&mut session).unwrap();
        assert_eq!(session.program.len(), 1);
    }

    #[test]
    fn later_pipeline_sees_completed_stages() {
        let mut session = session_with(vec![Member::Type(TypeDecl::class("A"))]);
        Pipeline::new()
            .with(Reset)
            .with(FoldSymbols)
            .with(Discover)
            .run(&mut session)
            .unwrap();
        Pipeline::new().with(Resolve).with(Sort).run(&mut session).unwrap();
        assert!(session.has_completed("sort"));
    }

    #[test]
    fn folded_symbols_select_regions() {
        let text = r#"{
            "name": "a.cs",
            "members": [{
                "kind": "region",
                "symbol": "TYPESCRIPT",
                "then": [{"kind": "type", "keyword": "class", "name": "OnlyTs"}],
                "otherwise": [{"kind": "type", "keyword": "class", "name": "Elsewhere"}]
            }]
        }"#;
        let mut session = Session::new(Program::new(Rules::default(), Default::default()));
        session.symbols.push("TYPESCRIPT".to_string());
        session.add_source(TextSource::new("a.cs", text, &retarget_syntax::JSON_READER));
        Pipeline::standard().run(&mut session).unwrap();
        assert!(session.program.find_class("OnlyTs").is_some());
        assert!(session.program.find_class("Elsewhere").is_none());
    }

    #[test]
    fn ignored_namespace_is_invisible() {
        let ns = NamespaceDecl {
            name: "Game.Tests".to_string(),
            members: vec![Member::Type(TypeDecl::class("Fixture"))],
        };
        let mut session = session_with(vec![
            Member::Namespace(ns),
            Member::Type(TypeDecl::class("Game")),
        ]);
        session.program.rules.ignored_namespaces.push("Tests".to_string());
        Pipeline::standard().run(&mut session).unwrap();
        assert_eq!(session.program.len(), 1);
        assert_eq!(session.extensions["discovery"]["skipped_namespaces"], 1);
    }
}
