//! soundscape: builds ambient soundscapes from caption text or keyword tags.
//!
//! Subcommands:
//! - `tags`: print the tags extracted from a caption
//! - `build`: resolve, load, mix and export a soundscape
//! - `check`: list tags with no clips in the registry

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use soundscape_engine::cli::{BuildArgs, Cli, Command, TagSource};
use soundscape_engine::config::EngineConfig;
use soundscape_engine::error::SoundscapeError;
use soundscape_engine::logging::init_tracing;
use soundscape_engine::pipeline::{Pipeline, SoundscapeOutput, TagInput};
use soundscape_engine::registry::AssetRegistry;
use soundscape_engine::tags::extract_tags_with;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.json_logs);

    let mut config = EngineConfig::from_env();
    cli.apply_to(&mut config);
    if let Some(problem) = config.validate() {
        return Err(SoundscapeError::invalid_config(problem).into());
    }

    match cli.command {
        Command::Tags { ref caption } => {
            let tags = extract_tags_with(&caption.join(" "), config.punctuation);
            println!("{}", tags);
            Ok(())
        }
        Command::Check(ref source) => run_check(&config, source),
        Command::Build(ref args) => run_build(&config, args).await,
    }
}

/// Prints tags from `source` that have no registry entry.
fn run_check(config: &EngineConfig, source: &TagSource) -> Result<()> {
    let registry = config.load_registry()?;
    let tags = tag_input(config, source).into_tag_set()?;

    let missing = registry.missing_tags(&tags);
    if missing.is_empty() {
        eprintln!("All {} tags have clips.", tags.len());
    } else {
        eprintln!("{} of {} tags have no clips:", missing.len(), tags.len());
        for tag in missing {
            println!("{}", tag);
        }
    }
    Ok(())
}

/// Builds a soundscape and writes it, plus its metadata sidecar.
async fn run_build(config: &EngineConfig, args: &BuildArgs) -> Result<()> {
    let registry: Arc<AssetRegistry> = Arc::new(config.load_registry()?);
    let pipeline = Pipeline::from_config(config, registry);

    eprintln!("=== soundscape build ===");
    eprintln!("Mode: {}", config.mode);
    eprintln!("Target duration: {}ms", config.target_duration_ms);
    eprintln!("Fill policy: {}", config.fill_policy);
    eprintln!();

    let start_time = Instant::now();
    let input = tag_input(config, &args.source);
    let SoundscapeOutput {
        bytes,
        mut soundscape,
    } = pipeline
        .build_soundscape(input, config.mode, config.target_duration_ms)
        .await?;

    let output_path = match args.output {
        Some(ref path) => path.clone(),
        None => config
            .effective_output_dir()
            .join(format!(
                "{}.{}",
                soundscape.soundscape_id,
                config.export_format.extension()
            )),
    };
    write_file(&output_path, &bytes)?;
    soundscape.path = Some(output_path.clone());

    if !args.no_sidecar {
        let sidecar = output_path.with_extension("json");
        let json = soundscape.to_json().context("failed to serialize metadata")?;
        write_file(&sidecar, json.as_bytes())?;
        eprintln!("Metadata: {}", sidecar.display());
    }

    eprintln!("Build complete in {:.2}s", start_time.elapsed().as_secs_f32());
    eprintln!("  Tags: {}", soundscape.tags.join(", "));
    if !soundscape.unresolved_tags.is_empty() {
        eprintln!("  Unresolved: {}", soundscape.unresolved_tags.join(", "));
    }
    eprintln!("  Clips used: {}", soundscape.included_assets.len());
    for failure in &soundscape.failed_assets {
        eprintln!("  Skipped {}: {}", failure.asset, failure.reason);
    }
    eprintln!("  Duration: {}ms", soundscape.duration_ms);
    println!("{}", output_path.display());

    Ok(())
}

/// Turns CLI tag arguments into pipeline input.
fn tag_input(config: &EngineConfig, source: &TagSource) -> TagInput {
    match (&source.tags, &source.caption) {
        (Some(tags), _) => TagInput::from(tags.as_str()),
        (None, Some(caption)) => TagInput::from(extract_tags_with(caption, config.punctuation)),
        (None, None) => TagInput::Delimited(String::new()),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn caption_source_extracts_tags() {
        let source = TagSource {
            tags: None,
            caption: Some("waves on the beach".to_string()),
        };
        let tags = tag_input(&EngineConfig::default(), &source)
            .into_tag_set()
            .unwrap();
        assert_eq!(tags.to_strings(), vec!["beach", "waves"]);
    }

    #[test]
    fn write_file_creates_parents() {
        let dir = tempdir().unwrap();
        let path: PathBuf = dir.path().join("nested/out/scape.wav");
        write_file(&path, b"RIFF").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF");
    }
}
