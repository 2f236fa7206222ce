//! Minimal CLI: schema files → (generated sources | resolved registry view)
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::info;

use crate::config::GeneratorConfig;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate serialize/deserialize routines from JSON class-hierarchy schemas
#[derive(Parser, Debug)]
#[command(name = "serialgen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate one source file per schema file
    Generate(GenerateOut),
    /// resolve schemas and print the JSON debug view of each registry
    Resolve(ResolveOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more schema files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// generator config (.json); built-in defaults if omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory
    #[arg(short, long)]
    out: PathBuf,

    /// write nothing; fail if any generated file is missing or stale
    #[arg(long)]
    check: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ResolveOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// What happened to one schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Written,
    UpToDate,
    Stale,
}

#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub outcome: Result<FileOutcome>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> Result<GeneratorConfig> {
        match self.config.as_ref() {
            Some(path) => GeneratorConfig::load(path),
            None => Ok(GeneratorConfig::default()),
        }
    }

    fn source_paths(&self) -> Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow!("failed to resolve input file paths: {error}"))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let config = target.input_settings.load_config()?;
                let sources = target.input_settings.source_paths()?;
                let reports = generate_files(&sources, &target.out, &config, target.check);

                let mut failed = 0usize;
                for report in &reports {
                    match &report.outcome {
                        Ok(FileOutcome::Written) => {
                            eprintln!("{} {}", "✅ wrote".green(), report.target.display());
                        }
                        Ok(FileOutcome::UpToDate) => {
                            eprintln!("{} {}", "✅ up to date".green(), report.target.display());
                        }
                        Ok(FileOutcome::Stale) => {
                            failed += 1;
                            eprintln!("{} {}", "❌ stale".red(), report.target.display());
                        }
                        Err(error) => {
                            failed += 1;
                            eprintln!("{} {error:#}", "❌ failed:".red());
                        }
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} schema file(s) failed", reports.len());
                }
                Ok(())
            }
            Command::Resolve(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let sources = target.input_settings.source_paths()?;
                let mut view = serde_json::Map::new();
                for source_path in sources {
                    let source = std::fs::read_to_string(&source_path)
                        .with_context(|| format!("failed to read schema file {source_path:?}"))?;
                    let registry = crate::resolve_source(&source)
                        .with_context(|| format!("failed to resolve {source_path:?}"))?;
                    view.insert(
                        source_path.to_string_lossy().to_string(),
                        serde_json::to_value(&registry)?,
                    );
                }
                let view_src = serde_json::to_string_pretty(&view)?;
                if let Some(out) = target.out.as_ref() {
                    write_atomically(out, &view_src)?;
                } else {
                    println!("{view_src}");
                }
                Ok(())
            }
        }
    }
}

/// Generate every schema file independently, in parallel. One file failing
/// never affects the others, and a failed file leaves its target untouched.
/// Sources that would produce the same target all fail without writing.
pub fn generate_files(
    sources: &[PathBuf],
    out_dir: &Path,
    config: &GeneratorConfig,
    check: bool,
) -> Vec<FileReport> {
    let targets = sources
        .iter()
        .map(|source| target_path(source, out_dir, config))
        .collect::<Vec<_>>();
    let mut claims = IndexMap::<&Path, Vec<&Path>>::new();
    for (source, target) in sources.iter().zip(&targets) {
        claims.entry(target.as_path()).or_default().push(source.as_path());
    }

    sources
        .par_iter()
        .zip(targets.par_iter())
        .map(|(source, target)| {
            let outcome = match claims.get(target.as_path()) {
                Some(claimants) if claimants.len() > 1 => Err(anyhow!(
                    "output {target:?} would be produced by {} schema files: {claimants:?}",
                    claimants.len()
                )),
                _ => generate_file(source, target, config, check),
            }
            .with_context(|| format!("schema file {source:?}"));
            FileReport {
                source: source.clone(),
                target: target.clone(),
                outcome,
            }
        })
        .collect()
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn target_path(source: &Path, out_dir: &Path, config: &GeneratorConfig) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    out_dir.join(config.output_file_name(&stem))
}

fn generate_file(
    source: &Path,
    target: &Path,
    config: &GeneratorConfig,
    check: bool,
) -> Result<FileOutcome> {
    let schema_src = std::fs::read_to_string(source)
        .with_context(|| format!("failed to read schema file {source:?}"))?;
    let rendered = crate::generate_source(&schema_src, config)?;

    if check {
        let existing = std::fs::read_to_string(target).ok();
        return Ok(if existing.as_deref() == Some(rendered.as_str()) {
            FileOutcome::UpToDate
        } else {
            FileOutcome::Stale
        });
    }

    write_atomically(target, &rendered)?;
    info!(source = %source.display(), target = %target.display(), "generated");
    Ok(FileOutcome::Written)
}

/// Write through a temp file in the target directory so readers never see a
/// half-written artifact.
fn write_atomically(target: &Path, contents: &str) -> Result<()> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)
        .with_context(|| format!("failed to create output directory {parent:?}"))?;
    let mut staged = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("failed to stage output in {parent:?}"))?;
    staged.write_all(contents.as_bytes())?;
    staged
        .persist(target)
        .map_err(|error| error.error)
        .with_context(|| format!("failed to write {target:?}"))?;
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            // Treat as a glob pattern
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                match entry {
                    Ok(p) => {
                        matched_any = true;
                        out.push(p);
                    }
                    Err(e) => return Err(Box::new(e)),
                }
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                return Err(format!("glob pattern matched no files: {pattern}").into());
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    // glob yields sorted paths per pattern; keep the overall order stable too
    out.sort();
    out.dedup();
    Ok(out)
}

#[cfg(test)]
#[path = "cli/cli_tests.rs"]
mod cli_tests;
