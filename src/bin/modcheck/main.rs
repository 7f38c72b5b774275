//! modcheck CLI - Check that a Go project agrees with its dependencies on
//! module versions

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modcheck::core::DependencyError;
use modcheck::ops::{
    check, format_result, format_result_json, MatchConfig, MatchConfigError, OutputFormat,
};
use modcheck::sources::{GoListLoader, JsonFileLoader, PackageLoader};
use modcheck::util::config::{global_config_path, load_config, project_config_path};
use modcheck::util::diagnostic::{emit, suggestions, Diagnostic};

mod cli;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    match run(cli, color) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            report_error(&e, color);
            std::process::exit(1);
        }
    }
}

/// Returns whether the check passed.
fn run(cli: Cli, color: bool) -> Result<bool> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("modcheck=debug")
    } else {
        EnvFilter::new("modcheck=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let project_root = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to get current directory")?,
    };

    let config = load_config(
        global_config_path().as_deref(),
        &project_config_path(&project_root),
    );

    // Validate the configuration before doing any loading.
    let match_config = MatchConfig::from_flags(
        config.check.match_dep.iter().chain(&cli.match_dep),
        config
            .check
            .match_replaces
            .iter()
            .chain(&cli.match_replaces)
            .cloned(),
    )
    .context("parsing flags")?;

    let output_format: OutputFormat = match cli.output_format.or(config.check.output_format) {
        Some(format) => format.parse()?,
        None => OutputFormat::default(),
    };

    let loader: Box<dyn PackageLoader> = match cli.from_json {
        Some(path) => Box::new(JsonFileLoader::new(path)),
        None => {
            let go = match cli.go.or(config.go.binary) {
                Some(go) => GoListLoader::new(go),
                None => GoListLoader::from_path()?,
            };
            let go = go.with_flags(config.go.flags);
            Box::new(match cli.dir {
                Some(dir) => go.with_cwd(dir),
                None => go,
            })
        }
    };

    let result = check(loader.as_ref(), &cli.pattern, &match_config)?;

    match output_format {
        OutputFormat::Human => {
            eprint!("{}", format_result(&result, color)?);
            if !result.passed() {
                let diag = Diagnostic::error(format!(
                    "found dependency mismatches ({})",
                    result.mismatches.len()
                ))
                .with_suggestion(suggestions::ALIGN_VERSIONS);
                emit(&diag, color);
            }
        }
        OutputFormat::Json => println!("{}", format_result_json(&result)?),
    }

    Ok(result.passed())
}

fn report_error(e: &anyhow::Error, color: bool) {
    for (depth, cause) in e.chain().enumerate() {
        if let Some(err) = cause.downcast_ref::<DependencyError>() {
            // Outermost context first, down to the manifest that failed.
            let mut diag = err.to_diagnostic();
            for layer in e.chain().take(depth) {
                diag = diag.with_context(layer.to_string());
            }
            emit(&diag.with_context(err.to_string()), color);
            return;
        }
        if let Some(err) = cause.downcast_ref::<MatchConfigError>() {
            let mut diag = Diagnostic::error(format!("{:#}", e));
            if !matches!(err, MatchConfigError::DuplicateTarget { .. }) {
                diag = diag.with_suggestion(suggestions::MATCH_DEP_FORMAT);
            }
            emit(&diag, color);
            return;
        }
    }

    eprintln!("error: {:#}", e);
}
