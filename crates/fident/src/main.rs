use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::{Term, style};
use fident_archive::{
    ArchiveExtractor, BatchReport, CancellationToken, Error as ArchiveError, TextRecognizer,
};
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{App, Commands};
use crate::config::Config;
use crate::ocr::TesseractCli;
use crate::progress::BatchTracker;

mod alert;
mod cli;
mod config;
mod ocr;
mod progress;
mod table;

fn main() -> Result<()> {
    let app = App::parse();
    let config = Config::load(app.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.log_level, app.verbose);

    match &app.cmd {
        Some(Commands::Ocr(arg)) => run_ocr(&config.apply_ocr(arg), &arg.image),
        Some(Commands::Config) => {
            print!("{}", config.to_toml().context("failed to render configuration")?);
            Ok(())
        }
        None => run_drop(
            config.apply_drop(&app.drop),
            app.drop.paths.clone(),
            app.drop.ocr,
            app.verbose > 0,
        ),
    }
}

fn init_tracing(level: &str, verbose: u8) {
    let default = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .thread_name("fident-worker")
        .enable_all()
        .build()
        .context("failed to start runtime")
}

fn run_drop(config: Config, paths: Vec<PathBuf>, ocr: bool, verbose: bool) -> Result<()> {
    let options = config
        .extract_options()
        .context("invalid extraction settings")?;
    let extractor = ArchiveExtractor::new(options);
    let dropped = paths.len();
    let cancel = CancellationToken::new();

    let outcome = runtime()?.block_on(async {
        let trigger = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                trigger.cancel();
            }
        });

        let tracker = BatchTracker::new(dropped);
        let outcome = extractor
            .extract_batch_with(paths, &cancel, |event| {
                tracker.step(event);
            })
            .await;
        tracker.finish();
        outcome
    });

    let mut report = match outcome {
        Err(ArchiveError::Cancelled) => bail!("extraction cancelled"),
        other => other.context("batch extraction failed")?,
    };

    let term = Term::stdout();
    term.write_line(&table::render(&report, dropped).to_string())?;

    let errors = Term::stderr();
    alert::show(&errors, &report.notifications, verbose)?;
    alert::show_skipped(&errors, &report.extractions)?;

    if ocr {
        recognize_images(&config, &report, &term)?;
    }

    keep_or_discard(&config, &mut report, &term)
}

fn recognize_images(config: &Config, report: &BatchReport, term: &Term) -> Result<()> {
    let recognizer = recognizer(config);
    for item in table::items(report) {
        let Some(image) = item.ocr_target() else {
            continue;
        };
        match recognizer.recognize(image, &config.ocr_language, &config.tessdata) {
            Ok(text) => {
                term.write_line(&style(&item.name).cyan().bold().to_string())?;
                term.write_line(&text)?;
            }
            Err(err) => warn!(image = %image.display(), error = %err, "recognition failed"),
        }
    }
    Ok(())
}

fn keep_or_discard(config: &Config, report: &mut BatchReport, term: &Term) -> Result<()> {
    if !config.keep_sessions {
        if report.extractions.iter().any(|e| e.session_root().is_some()) {
            term.write_line(
                &style("extracted files are removed on exit, pass --keep to retain them")
                    .dim()
                    .to_string(),
            )?;
        }
        return Ok(());
    }

    for extraction in &mut report.extractions {
        if let Some(root) = extraction.persist() {
            info!(archive = %extraction.source.display(), root = %root.display(), "session kept");
        }
    }
    Ok(())
}

fn recognizer(config: &Config) -> TesseractCli {
    match &config.tesseract {
        Some(program) => TesseractCli::with_program(program),
        None => TesseractCli::new(),
    }
}

fn run_ocr(config: &Config, image: &Path) -> Result<()> {
    let text = recognizer(config)
        .recognize(image, &config.ocr_language, &config.tessdata)
        .with_context(|| format!("failed to recognize text in '{}'", image.display()))?;
    println!("{text}");
    Ok(())
}
