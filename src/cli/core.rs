//! Shell state, error types, and command dispatch.

use std::{io, sync::Arc};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    core::{Clock, LedgerEngine, SystemClock},
    errors::{LedgerError, ValidationError},
    presenter::Presenter,
    storage::{JsonFileStore, TransactionStore, DEFAULT_STORAGE_KEY},
    utils::paths,
};

use super::{commands, output, presenter::TextPresenter, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Shell-level failures that end the session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

/// Failures of a single command; reported to the user and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Invalid transaction: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub engine: LedgerEngine,
    pub presenter: TextPresenter,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

/// Storage key for the ledger, falling back to the default when the configured
/// one would collide with the config file.
fn ledger_key(config: &Config) -> &str {
    if JsonFileStore::is_reserved_key(&config.storage_key) {
        tracing::warn!(key = %config.storage_key, "storage key is reserved; using default");
        output::warning(format!(
            "Storage key `{}` is reserved; using `{}`.",
            config.storage_key, DEFAULT_STORAGE_KEY
        ));
        DEFAULT_STORAGE_KEY
    } else {
        &config.storage_key
    }
}

impl ShellContext {
    /// Opens the ledger stored in the application data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = paths::app_data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "using default configuration");
                output::warning(format!("{err}; using defaults."));
                Config::default()
            }
        };
        let backend = JsonFileStore::new(base)?;
        let key = ledger_key(&config);
        let store = TransactionStore::with_key(Box::new(backend), key);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let engine = LedgerEngine::initialize(store, clock);
        Ok(Self::with_parts(mode, engine, config_manager, config))
    }

    /// Assembles a context from already constructed parts.
    pub fn with_parts(
        mode: CliMode,
        engine: LedgerEngine,
        config_manager: ConfigManager,
        config: Config,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        let engine = engine.with_month_bucketing(config.month_bucketing);
        Self {
            mode,
            registry,
            engine,
            presenter: TextPresenter::new(config.currency_symbol.clone()),
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        format!("ledger ({})> ", self.engine.len())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.words().collect()
    }

    /// Redraws the whole ledger.
    pub fn render(&mut self) {
        self.presenter.render(&self.engine.snapshot());
    }

    /// Surfaces any save failure, then redraws.
    pub fn after_mutation(&mut self) {
        if let Some(warning) = self.engine.take_persistence_warning() {
            output::warning(warning);
        }
        self.render();
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.find(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Parses and runs one input line.
    pub fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .words()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit ledger?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}
