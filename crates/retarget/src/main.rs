//! The retarget CLI.
//!
//! - `retarget translate <docs...> --target typescript --out <dir>` reads
//!   syntax documents, runs the pipeline and writes one file per class
//! - `retarget targets` lists the registered writers
//!
//! Directories given as documents are scanned (not recursively) for files
//! a registered reader accepts.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use retarget_core::{RetargetConfig, TextSource, Translator, writer_for_language, writers};
use retarget_syntax::{Reader, reader_for_extension};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "retarget", version, about = "Translate class-based source into another language")]
struct Cli {
    /// Log pipeline progress (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate syntax documents into target-language files
    Translate {
        /// Document files or directories of documents
        #[arg(required = true)]
        docs: Vec<PathBuf>,

        /// Target language
        #[arg(short, long, default_value = "typescript")]
        target: String,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Extra config file, merged over the global and project config
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List available target languages
    Targets,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Translate {
            docs,
            target,
            out,
            config,
        } => translate(&docs, &target, &out, config.as_deref()),
        Commands::Targets => {
            for writer in writers() {
                println!("{}\t.{}", writer.language(), writer.extension());
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(extra: Option<&Path>) -> Result<RetargetConfig> {
    let root = std::env::current_dir().context("cannot determine working directory")?;
    let mut config = RetargetConfig::load(&root)?;
    if let Some(path) = extra {
        config = config.merge(RetargetConfig::load_file(path)?);
    }
    Ok(config)
}

fn translate(docs: &[PathBuf], target: &str, out: &Path, config: Option<&Path>) -> Result<()> {
    let Some(writer) = writer_for_language(target) else {
        let known: Vec<&str> = writers().iter().map(|w| w.language()).collect();
        bail!("unknown target `{}` (available: {})", target, known.join(", "));
    };
    let translator = Translator::new(writer, load_config(config)?);

    let mut session = translator.session();
    for path in collect_documents(docs)? {
        session.add_source(load_source(&path)?);
    }
    let files = translator.translate(&mut session)?;

    std::fs::create_dir_all(out)
        .with_context(|| format!("cannot create output directory {}", out.display()))?;
    for file in &files {
        let path = out.join(&file.path);
        std::fs::write(&path, &file.contents)
            .with_context(|| format!("cannot write {}", path.display()))?;
    }
    tracing::info!(files = files.len(), out = %out.display(), "wrote output");
    Ok(())
}

/// Expand directories into their readable files, sorted by name so runs
/// are reproducible.
fn collect_documents(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for path in paths {
        if !path.is_dir() {
            documents.push(path.clone());
            continue;
        }
        let entries = std::fs::read_dir(path)
            .with_context(|| format!("cannot read directory {}", path.display()))?;
        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("cannot read directory {}", path.display()))?;
            let file = entry.path();
            if file.is_file() && reader_for(&file).is_some() {
                found.push(file);
            }
        }
        found.sort();
        documents.extend(found);
    }
    Ok(documents)
}

fn reader_for(path: &Path) -> Option<&'static dyn Reader> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(reader_for_extension)
}

fn load_source(path: &Path) -> Result<TextSource> {
    let Some(reader) = reader_for(path) else {
        bail!("no reader for {}", path.display());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Ok(TextSource::new(path.display().to_string(), text, reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const DOC: &str = r#"{"name": "A.cs", "members": [
        {"kind": "type", "keyword": "class", "name": "A"}
    ]}"#;

    #[test]
    fn directories_expand_to_readable_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.json"), DOC).unwrap();
        std::fs::write(dir.path().join("a.json"), DOC).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let found = collect_documents(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.cs");
        std::fs::write(&path, "class A {}").unwrap();
        assert!(load_source(&path).is_err());
    }

    #[test]
    fn translate_writes_one_file_per_class() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("A.json");
        std::fs::write(&doc, DOC).unwrap();
        let out = dir.path().join("out");

        translate(&[doc], "typescript", &out, None).unwrap();

        let written = std::fs::read_to_string(out.join("A.ts")).unwrap();
        assert_eq!(written, "export class A {\n}\n");
    }

    #[test]
    fn unknown_target_lists_available_ones() {
        let err = translate(&[], "cobol", Path::new("out"), None).unwrap_err();
        assert!(err.to_string().contains("typescript"));
    }
}
