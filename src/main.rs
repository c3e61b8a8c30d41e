//! Command-line access to the translation store.

use std::io::{
    self,
    Write,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{
    Args,
    Parser,
    Subcommand,
};
use i18n_store_backend::backend::{
    Chain,
    Resolver,
    StoreBackend,
};
use i18n_store_backend::config::{
    ConfigError,
    ConfigManager,
};
use i18n_store_backend::{
    I18n,
    I18nError,
    Options,
    StoreError,
    StoreOptions,
    Tree,
    Value,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Workspace directory holding `.i18n-store.json`
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate a key; records it as a stub when missing
    Translate(TranslateArgs),
    /// Store nested translations given as a JSON object
    Store {
        locale: String,
        json: String,
        /// Treat dots in JSON keys as nesting instead of escaping them
        #[arg(long)]
        no_escape: bool,
    },
    /// List locales with stored translations
    Locales,
}

#[derive(Debug, Args)]
struct TranslateArgs {
    locale: String,
    key: String,

    /// Scope segment prepended to the key (repeatable)
    #[arg(long)]
    scope: Vec<String>,

    /// Key separator for this call
    #[arg(long)]
    separator: Option<char>,

    /// Selects a plural form
    #[arg(long, allow_negative_numbers = true)]
    count: Option<i64>,

    /// Text used when the key is missing
    #[arg(long)]
    default: Option<String>,

    /// Interpolation value as name=value (repeatable)
    #[arg(long = "value", value_parser = parse_key_value)]
    values: Vec<(String, String)>,
}

impl TranslateArgs {
    /// Options for the translation call.
    fn options(&self) -> Options {
        let mut options = Options::new().with_scope(self.scope.iter().cloned());
        options.separator = self.separator;
        options.count = self.count;
        options.default = self.default.clone().map(Value::Text);
        for (name, value) in &self.values {
            options = options.with_value(name.as_str(), value.as_str());
        }
        options
    }
}

/// Parses `name=value`.
fn parse_key_value(input: &str) -> Result<(String, String), String> {
    input
        .split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{input}'"))
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    I18n(#[from] I18nError),

    #[error("Invalid translations JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Builds the translator for the workspace: the store backend behind a chain,
/// so misses are recorded.
fn translator(config: &ConfigManager) -> Result<I18n, CliError> {
    let settings = config.get_settings();
    let store = config.open_store()?;
    let primary: Arc<dyn Resolver> = Arc::new(StoreBackend::from_settings(store, settings));
    Ok(I18n::from_settings(Arc::new(Chain::new(primary, [])), settings))
}

fn run(args: Arguments, out: &mut impl Write) -> Result<(), CliError> {
    let mut config = ConfigManager::new();
    config.load_settings(Some(args.workspace))?;
    let i18n = translator(&config)?;

    match args.command {
        Command::Translate(translate) => {
            let translated =
                i18n.translate(Some(&translate.locale), &translate.key, &translate.options())?;
            match translated.as_text() {
                Some(text) => writeln!(out, "{text}")?,
                None => writeln!(out, "{}", serde_json::to_string_pretty(&translated.to_json())?)?,
            }
        }
        Command::Store { locale, json, no_escape } => {
            let data: serde_json::Value = serde_json::from_str(&json)?;
            i18n.store_translations(&locale, &Tree::from(data), StoreOptions { escape: !no_escape })?;
        }
        Command::Locales => {
            for locale in i18n.available_locales() {
                writeln!(out, "{locale}")?;
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Arguments::parse();
    let mut stdout = io::stdout().lock();
    match run(args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(io::stderr(), "Error: {error}");
            ExitCode::FAILURE
        }
    }
}
