mod app;
mod cli;
mod config;
mod progress;
mod synth;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use composer::{ConfigurationError, ProcessEnv, RunOptions};
use config::Settings;
use progress::StepProgress;
use std::process::ExitCode;
use synth::ManifestSynthesizer;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match run(&ctx, &cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(ctx: &Context, cli: &Cli) -> Result<()> {
    let settings = Settings::from_cli(cli)?;
    log::debug!("Settings: {settings:?}");

    let mut synthesizer = ManifestSynthesizer::new(&settings.output_dir);
    let mut progress = StepProgress::new(ctx.quiet, settings.dry_run);

    let summary = composer::run(
        &ProcessEnv,
        settings.tags.clone(),
        app::register_stacks,
        &mut synthesizer,
        &mut progress,
        &RunOptions {
            dry_run: settings.dry_run,
        },
    )?;

    if ctx.quiet {
        return Ok(());
    }

    if settings.dry_run || ctx.verbose > 0 {
        ui::display_plan(&summary.plan);
        println!();
    }

    ui::kv("Account", &summary.params.account_id);
    ui::kv("Region", &summary.params.region);

    match summary.artifact {
        Some(report) => {
            ui::success(&format!(
                "Synthesized {} stacks to {}",
                summary.plan.len(),
                report.out_dir.display()
            ));
            if ctx.verbose > 0 {
                for file in &report.files {
                    ui::dim(&file.display().to_string());
                }
            }
        }
        None => ui::warn("Dry run: nothing written"),
    }

    Ok(())
}

/// Write the error kind and message to stderr
fn report(err: &anyhow::Error) {
    ui::error(&error_line(err));
}

/// `Kind: message` for configuration errors, the full context chain otherwise
fn error_line(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ConfigurationError>() {
        Some(config_err) => format!("{}: {}", config_err.kind(), config_err),
        None => format!("{err:#}"),
    }
}
