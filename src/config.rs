// src/config.rs
use crate::constants::{HTML_MAX_NESTING_DEPTH, NOTION_API_KEY_ENV};
use crate::error::AppError;
use crate::types::{ApiKey, PageId, ValidatedUrl};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// HTML or CSV file to import
    pub input: PathBuf,

    /// Notion page URL or ID to import under. Without it the parsed
    /// content is printed as JSON instead of uploaded.
    #[arg(short, long)]
    pub parent: Option<String>,

    /// Input format (inferred from the file extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<InputFormat>,

    /// Base URL for the document (HTML only)
    #[arg(long)]
    pub base: Option<String>,

    /// Maximum element nesting accepted in HTML input
    #[arg(long, default_value_t = HTML_MAX_NESTING_DEPTH)]
    pub max_depth: usize,

    /// Treat the first CSV row as data rather than column names
    #[arg(long, default_value_t = false)]
    pub no_header: bool,

    /// CSV column that becomes the database title
    #[arg(long, default_value_t = 0)]
    pub title_column: usize,

    /// Also write the parsed content as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Html,
    Csv,
}

impl InputFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "html" | "htm" | "xhtml" => Some(Self::Html),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Where parsed content gets uploaded.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub parent: PageId,
    pub api_key: ApiKey,
}

/// Resolved import configuration.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub input: PathBuf,
    pub format: InputFormat,
    pub base_url: Option<ValidatedUrl>,
    pub max_depth: usize,
    pub header_row: bool,
    pub title_column: usize,
    pub output_file: Option<PathBuf>,
    pub upload: Option<UploadTarget>,
    pub verbose: bool,
}

impl ImportConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key = std::env::var(NOTION_API_KEY_ENV).ok();
        Self::resolve_with_key(cli, api_key)
    }

    /// Like [`ImportConfig::resolve`], with the API key supplied directly.
    ///
    /// The key is only required when there is somewhere to upload to.
    pub fn resolve_with_key(
        cli: CommandLineInput,
        api_key: Option<String>,
    ) -> Result<Self, AppError> {
        let format = match cli.format {
            Some(format) => format,
            None => InputFormat::from_path(&cli.input).ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "cannot infer the format of {}; pass --format html or --format csv",
                    cli.input.display()
                ))
            })?,
        };

        if cli.max_depth == 0 {
            return Err(AppError::MissingConfiguration(
                "--max-depth must be at least 1".to_string(),
            ));
        }

        let base_url = cli.base.as_deref().map(ValidatedUrl::parse).transpose()?;

        let upload = match cli.parent {
            Some(parent) => {
                let key = api_key.ok_or_else(|| {
                    AppError::MissingConfiguration(format!(
                        "{} environment variable not set",
                        NOTION_API_KEY_ENV
                    ))
                })?;
                Some(UploadTarget {
                    parent: PageId::parse(&parent)?,
                    api_key: ApiKey::new(key)?,
                })
            }
            None => None,
        };

        Ok(ImportConfig {
            input: cli.input,
            format,
            base_url,
            max_depth: cli.max_depth,
            header_row: !cli.no_header,
            title_column: cli.title_column,
            output_file: cli.output,
            upload,
            verbose: cli.verbose,
        })
    }
}
