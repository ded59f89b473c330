//! oopnlp: analyze stories through a configured annotator pipeline, or
//! generate starter input files.
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use oop_core::{normalize_plain_unicode, Metadata, Pipeline, RunResult};
use oop_io::config::{DEFAULT_ANNOTATORS, DEFAULT_METADATA, DEFAULT_PARAMETER_STORE, DEFAULT_STORY};
use oop_io::{
    generate_templates, load_metadata, load_parameter_store, read_annotator_list, read_text,
    DirectoryWriter, OutputWriter,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Run the annotator pipeline over one or more stories
    Analyze,
    /// Write starter parameterStore, metadata, annotators and story files
    Generate,
}

#[derive(Debug, Parser)]
#[command(name = "oopnlp", version, about = "Ordered annotation pipeline for prose")]
pub struct Cli {
    #[arg(short, long, value_enum)]
    pub action: Action,

    /// Location of input files
    #[arg(short, long, default_value = ".", env = "OOP_INPUT_PATH")]
    pub input_path: PathBuf,

    /// Location for output files
    #[arg(short, long, default_value = ".", env = "OOP_OUTPUT_PATH")]
    pub output_path: PathBuf,

    /// Parameter store file (.properties or .yaml), relative to the input path
    #[arg(short, long, default_value = DEFAULT_PARAMETER_STORE)]
    pub parameter_store: String,

    /// Metadata file in properties format, relative to the input path
    #[arg(short, long, default_value = DEFAULT_METADATA)]
    pub metadata: String,

    /// Annotator list, one name per line, relative to the input path
    #[arg(short = 'n', long, default_value = DEFAULT_ANNOTATORS)]
    pub annotators: String,

    /// Story files, relative to the input path. Each is an independent run.
    #[arg(short, long, default_value = DEFAULT_STORY, num_args = 1..)]
    pub story: Vec<String>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.action {
        Action::Generate => {
            let written = generate_templates(&cli.output_path)
                .with_context(|| format!("generating templates in {}", cli.output_path.display()))?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Action::Analyze => analyze(&cli).await,
    }
}

async fn analyze(cli: &Cli) -> Result<()> {
    let input = &cli.input_path;
    let params = load_parameter_store(&input.join(&cli.parameter_store))
        .context("loading parameter store")?;
    let metadata = load_metadata(&input.join(&cli.metadata)).context("loading metadata")?;
    let list = read_annotator_list(&input.join(&cli.annotators)).context("reading annotator list")?;

    let registry = oop_annotators::default_registry();
    let pipeline = Arc::new(
        registry
            .build_pipeline(&list, &params)
            .context("resolving annotators")?,
    );
    let writer = Arc::new(DirectoryWriter::new(&cli.output_path));

    let mut tasks = Vec::with_capacity(cli.story.len());
    for story in &cli.story {
        let path = input.join(story);
        let pipeline = pipeline.clone();
        let writer = writer.clone();
        let metadata = metadata.clone();
        tasks.push((
            path.clone(),
            tokio::task::spawn_blocking(move || analyze_story(&pipeline, writer.as_ref(), &path, metadata)),
        ));
    }

    // await every story before reporting
    let mut failures = 0usize;
    for (path, task) in tasks {
        let outcome = task
            .await
            .map_err(anyhow::Error::from)
            .and_then(|result| result);
        match outcome {
            Ok(result) => {
                tracing::info!(
                    story = %path.display(),
                    doc_id = %result.doc_id,
                    run_id = %result.run_id,
                    started_at = %result.started_at.to_rfc3339(),
                    "story analyzed"
                );
                println!("{}\t{}", result.doc_id, path.display());
            }
            Err(err) => {
                failures += 1;
                tracing::error!(story = %path.display(), error = %format!("{err:#}"), "analysis failed");
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} stories failed", failures, cli.story.len());
    }
    Ok(())
}

/// One complete run: read, normalize, annotate, write. Nothing is written
/// unless the pipeline finishes.
pub fn analyze_story(
    pipeline: &Pipeline,
    writer: &dyn OutputWriter,
    path: &Path,
    mut metadata: Metadata,
) -> Result<RunResult> {
    let raw = read_text(path)?;
    let text = normalize_plain_unicode(&raw);
    let result = pipeline
        .run(&text, &mut metadata)
        .with_context(|| format!("analyzing {}", path.display()))?;
    writer.write(&result)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["oopnlp", "--action", "analyze"]);
        assert_eq!(cli.action, Action::Analyze);
        assert_eq!(cli.parameter_store, "parameterStore.properties");
        assert_eq!(cli.annotators, "annotators.txt");
        assert_eq!(cli.story, vec!["story.txt".to_string()]);
    }

    #[test]
    fn test_multiple_stories() {
        let cli = Cli::parse_from(["oopnlp", "-a", "analyze", "-s", "one.txt", "two.txt"]);
        assert_eq!(cli.story, vec!["one.txt".to_string(), "two.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_then_analyze() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_str().unwrap();

        run(Cli::parse_from(["oopnlp", "-a", "generate", "-o", dir_arg]))
            .await
            .unwrap();
        run(Cli::parse_from(["oopnlp", "-a", "analyze", "-i", dir_arg, "-o", dir_arg]))
            .await
            .unwrap();

        let artifacts = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("AGGREGATES_"))
            .count();
        assert_eq!(artifacts, 1);
    }

    #[tokio::test]
    async fn test_missing_story_does_not_stop_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        generate_templates(dir.path()).unwrap();
        std::fs::write(dir.path().join("second.txt"), "Another short story.").unwrap();

        let err = run(Cli::parse_from([
            "oopnlp", "-a", "analyze", "-i", dir_arg, "-o", dir_arg, "-s", "missing.txt", "story.txt", "second.txt",
        ]))
        .await
        .unwrap_err();

        assert!(err.to_string().contains("1 of 3 stories failed"));
        let artifacts = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("AGGREGATES_"))
            .count();
        assert_eq!(artifacts, 2);
    }

    #[tokio::test]
    async fn test_unknown_annotator_writes_nothing() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        generate_templates(input.path()).unwrap();
        std::fs::write(input.path().join("annotators.txt"), "Unknown\n").unwrap();

        let err = run(Cli::parse_from([
            "oopnlp",
            "-a",
            "analyze",
            "-i",
            input.path().to_str().unwrap(),
            "-o",
            output.path().to_str().unwrap(),
        ]))
        .await
        .unwrap_err();

        assert!(format!("{err:#}").contains("CONFIG/UNKNOWN"));
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
    }
}
