// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notional::{
    CommandLineInput, ContentDelivery, ContentSource, ImportConfig, ImportedContent, Session,
    UploadReport,
};
use std::fs;

/// Sets up logging configuration.
///
/// Console output goes to stderr so printed JSON can be piped.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notional.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn report_upload(report: &UploadReport) {
    match report {
        UploadReport::Page { blocks, url, .. } => {
            eprintln!("✓ Created page with {} block(s): {}", blocks, url);
        }
        UploadReport::Database { rows, url, .. } => {
            eprintln!("✓ Created database with {} row(s): {}", rows, url);
        }
    }
}

async fn run(config: &ImportConfig) -> anyhow::Result<()> {
    let content: ImportedContent = config
        .load()
        .with_context(|| format!("failed to import {}", config.input.display()))?;

    if let Some(path) = &config.output_file {
        fs::write(path, content.to_json()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("✓ Parsed content saved to {}", path.display());
    }

    match &config.upload {
        Some(target) => {
            let session = Session::connect(&target.api_key)?;
            let report = session
                .deliver(&target.parent, &content)
                .await
                .context("upload to Notion failed")?;
            report_upload(&report);
        }
        None if config.output_file.is_none() => println!("{}", content.to_json()?),
        None => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = ImportConfig::resolve(cli)?;

    run(&config).await
}
