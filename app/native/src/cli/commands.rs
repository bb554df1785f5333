//! CLI command definitions using Clap.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use super::output::{self, ProbeReport};
use crate::config;
use crate::error::FloatError;
use crate::pip::{self, ProbeTarget};

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Float CLI - inspect the private picture-in-picture controller.
#[derive(Parser, Debug)]
#[command(name = "float")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Report what the picture-in-picture controller supports on this system.
    ///
    /// Looks up the controller class, the selectors the proxy relies on, and
    /// the delegate notifications it can relay. Nothing is constructed.
    Probe {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Probe a different controller class than the configured one.
        #[arg(long, value_name = "NAME")]
        class: Option<String>,
    },

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(float completions --shell zsh)"
    ///   float completions --shell fish > ~/.config/fish/completions/float.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Executes the parsed command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file passed with `--config`
    /// does not exist or cannot be parsed, or the command itself fails.
    pub fn execute(&self) -> Result<(), FloatError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(FloatError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            // An explicit file must parse; only the search paths fall back to defaults.
            config::load_config_from_path(&path)?;
            config::set_custom_config_path(path);
        }

        let settings = config::get_config();
        crate::init_logging(settings.effective_log_level());
        if let Some(warning) = config::load_warning() {
            tracing::warn!(error = warning, "float: configuration ignored, using defaults");
        }

        match &self.command {
            Commands::Probe { json, class } => Self::probe(*json, class.as_deref()),
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Runs the probe and prints the report.
    fn probe(json: bool, class: Option<&str>) -> Result<(), FloatError> {
        let mut target = ProbeTarget::from_config(&config::get_config().pip);
        let availability = match class {
            Some(name) if name.trim().is_empty() => {
                return Err(FloatError::InvalidArguments(
                    "--class requires a non-empty class name".to_string(),
                ));
            }
            Some(name) => {
                target.class_name = name.to_string();
                pip::probe_target(&target)
            }
            None => pip::probe().clone(),
        };

        let report = ProbeReport::new(&target, &availability);
        if json {
            output::print_highlighted_json(&serde_json::to_value(&report)?)?;
        } else {
            output::print_report(&report)?;
        }
        Ok(())
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "float", &mut io::stdout());
    }
}
