use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use docs_mdx_config::Config;
use docs_mdx_engine::{Pipeline, PipelineOptions, Sdk, document_to_mdx, io, to_json};
use rayon::prelude::*;
use relative_path::RelativePathBuf;

#[derive(Parser, Debug)]
#[command(name = "docs-mdx")]
#[command(version)]
#[command(about = "Run the docs MDX transform pipeline", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/docs-mdx/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process one file and print the result
    Process {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Scope the page to this SDK instead of inferring it from the path
        #[arg(long)]
        sdk: Option<Sdk>,

        #[arg(long, value_enum, default_value = "mdx")]
        format: Format,

        /// Resolve <SDKContent> blocks for this SDK
        #[arg(long, value_name = "SDK")]
        sdk_content: Option<String>,
    },

    /// Process every source file and write `.md` output
    Build {
        #[arg(value_name = "CONTENT_DIR")]
        content_dir: Option<PathBuf>,

        #[arg(value_name = "OUT_DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Print the pre-generated markdown for a page slug
    Raw {
        #[arg(value_name = "SLUG")]
        slug: Vec<String>,

        /// Directory holding the generated markdown
        #[arg(long, value_name = "DIR")]
        public: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Mdx,
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Process {
            file,
            sdk,
            format,
            sdk_content,
        } => {
            let output = process_file(&file, PipelineOptions { sdk, sdk_content }, format)?;
            print!("{output}");
        }
        Commands::Build {
            content_dir,
            out_dir,
        } => {
            let config = resolve_build_config(cli.config.as_deref(), content_dir, out_dir)?;
            let written = build(&config)?;
            log::info!("Wrote {written} files to {}", config.out_dir.display());
        }
        Commands::Raw { slug, public } => {
            let public = match public {
                Some(dir) => dir,
                None => load_config(cli.config.as_deref())?
                    .map(|config| config.out_dir)
                    .unwrap_or_else(|| PathBuf::from("public")),
            };
            let markdown = io::read_raw_markdown(&slug, &public)
                .with_context(|| format!("No markdown for '/{}'", slug.join("/")))?;
            print!("{markdown}");
        }
    }

    Ok(())
}

fn process_file(path: &Path, options: PipelineOptions, format: Format) -> Result<String> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = Pipeline::new(options).process(path, &source)?;
    Ok(match format {
        Format::Mdx => document_to_mdx(&doc),
        Format::Json => to_json(&doc)?,
    })
}

/// An explicit `--config` must exist; the default location is optional.
fn load_config(explicit: Option<&Path>) -> Result<Option<Config>> {
    let Some(config_path) = explicit else {
        log::debug!("Config path: {}", Config::config_path().display());
        return Ok(Config::load()?);
    };
    log::debug!("Config path: {}", config_path.display());
    match Config::load_from_path(config_path)? {
        Some(config) => Ok(Some(config)),
        None => bail!("Config file {} does not exist", config_path.display()),
    }
}

/// Positional arguments override the config file; without either there is
/// nothing to build.
fn resolve_build_config(
    config_path: Option<&Path>,
    content_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<Config> {
    let mut config = match (load_config(config_path)?, content_dir) {
        (Some(mut config), Some(content_dir)) => {
            config.content_dir = content_dir;
            config
        }
        (Some(config), None) => config,
        (None, Some(content_dir)) => Config::new(content_dir),
        (None, None) => bail!(
            "No content directory provided and no config file found at {}",
            Config::config_path().display()
        ),
    };
    if let Some(out_dir) = out_dir {
        config.out_dir = out_dir;
    }
    Ok(config)
}

/// Run the pipeline over every source file in parallel. Returns the number of
/// files written; the first failure is reported after all files are tried.
fn build(config: &Config) -> Result<usize> {
    io::validate_content_dir(&config.content_dir)
        .with_context(|| format!("Content path '{}' is invalid", config.content_dir.display()))?;

    let sdk = config
        .sdk
        .as_deref()
        .map(str::parse::<Sdk>)
        .transpose()
        .context("Invalid sdk in config")?;
    let pipeline = Pipeline::new(PipelineOptions {
        sdk,
        sdk_content: None,
    });
    let sources = config.source_files()?;

    let results: Vec<Result<()>> = sources
        .par_iter()
        .map(|path| build_one(&pipeline, config, path))
        .collect();

    let mut written = 0;
    let mut first_error = None;
    for result in results {
        match result {
            Ok(()) => written += 1,
            Err(e) => {
                log::error!("{e:#}");
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => {
            let failed = sources.len() - written;
            Err(e.context(format!("{failed} of {} files failed", sources.len())))
        }
        None => Ok(written),
    }
}

/// `source` is relative to the content directory.
fn build_one(pipeline: &Pipeline, config: &Config, source: &Path) -> Result<()> {
    let relative = RelativePathBuf::from_path(source)
        .with_context(|| format!("{} is not a portable path", source.display()))?;

    let text = io::read_source(&relative, &config.content_dir)?;
    let doc = pipeline.process(&config.content_dir.join(source), &text)?;
    let output = io::output_path_for(&relative);
    io::write_file(&output, &config.out_dir, &document_to_mdx(&doc))?;
    log::debug!("{relative} -> {output}");
    Ok(())
}
