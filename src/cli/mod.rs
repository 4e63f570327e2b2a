//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod selection;
pub mod settings;


use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::cli::selection::{format_servers, format_status, Workspace};
use crate::cli::settings::{SetContext, SettingError, SettingRegistry};
use crate::core::config::data::Config;
use crate::core::config::orchestrator::ConfigOrchestrator;
use crate::core::selection::ConversationKey;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "mcp-selection")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Inspect and edit per-conversation MCP server selections")]
#[command(
    long_about = "Keeps each conversation's selected MCP servers consistent with its session \
draft and with the servers advertised in config.toml.\n\n\
Conversations:\n\
  Pass a conversation id, or 'new' (the default) for a conversation that has not been created yet.\n\n\
Defaults:\n\
  Servers marked 'startup' are selected automatically for new conversations; an explicit\n\
  'clear' is remembered and never overwritten by defaults.\n\n\
Environment Variables:\n\
  RUST_LOG          Log filter for diagnostics on stderr (defaults to 'warn')"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log selection decisions to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// List the MCP servers the registry advertises
    Servers,
    /// Show the selected servers for a conversation
    Show {
        /// Conversation id ('new' when omitted)
        conversation: Option<String>,
    },
    /// Replace a conversation's selection with a JSON array of server names
    Select {
        /// Conversation id ('new' for a conversation not yet created)
        conversation: String,
        /// JSON array, e.g. '["search","files"]'
        selection: String,
    },
    /// Explicitly empty a conversation's selection
    Clear {
        /// Conversation id ('new' when omitted)
        conversation: Option<String>,
    },
    /// Keep the selection panel open (on) or let it close (off)
    Pin {
        /// on/off
        value: String,
    },
    /// Show the pinned flag, policy, and every known conversation
    Status,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value(s) for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
        /// Value to unset for the key (optional)
        value: Option<String>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    crate::logging::init_tracing(args.verbose);
    run(args)
}

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    match args.command {
        Commands::Servers => {
            let workspace = Workspace::open(&config_path)?;
            println!("{}", format_servers(workspace.registry()));
            Ok(())
        }
        Commands::Show { conversation } => {
            let key = ConversationKey::from_conversation_id(conversation.as_deref());
            let mut workspace = Workspace::open(&config_path)?;
            workspace.reconcile(&key);
            println!("{}", workspace.describe(&key));
            workspace.save()
        }
        Commands::Select {
            conversation,
            selection,
        } => {
            let key = ConversationKey::from(conversation);
            let mut workspace = Workspace::open(&config_path)?;
            let outcome = workspace.select_json(&key, &selection);
            if !outcome.accepted {
                eprintln!("⚠️  Ignored selection: expected a JSON array of server names");
                eprintln!("Example: mcp-selection select {key} '[\"search\"]'");
            } else if !outcome.dropped.is_empty() {
                eprintln!(
                    "⚠️  Not advertised, dropped: {}",
                    outcome.dropped.join(", ")
                );
            }
            println!("{}", workspace.describe(&key));
            workspace.save()
        }
        Commands::Clear { conversation } => {
            let key = ConversationKey::from_conversation_id(conversation.as_deref());
            let mut workspace = Workspace::open(&config_path)?;
            workspace.clear(&key);
            println!("✅ Cleared MCP selection for {key}");
            workspace.save()
        }
        Commands::Pin { value } => {
            let pinned = settings::helpers::parse_bool(&value)
                .ok_or_else(|| SettingError::InvalidBoolean(value.clone()))?;
            let mut workspace = Workspace::open(&config_path)?;
            workspace.set_pinned(pinned);
            println!(
                "✅ Selection panel pinned: {}",
                settings::helpers::format_bool(pinned)
            );
            workspace.save()
        }
        Commands::Status => {
            let workspace = Workspace::open(&config_path)?;
            println!("{}", format_status(&workspace));
            Ok(())
        }
        Commands::Set { key, value } => handle_set(&config_path, key, value),
        Commands::Unset { key, value } => handle_unset(&config_path, &key, value.as_deref()),
    }
}

fn handle_set(config_path: &Path, key: String, value: Vec<String>) -> Result<(), Box<dyn Error>> {
    let orchestrator = ConfigOrchestrator::new(config_path.to_path_buf());
    let config = orchestrator.load_with_cache()?;
    let registry = SettingRegistry::new();

    let Some(handler) = registry.get(&key) else {
        exit_with(SettingError::UnknownKey(key));
    };
    if value.is_empty() {
        print_settings(&registry, &config);
        return Ok(());
    }

    let mut ctx = SetContext {
        config: &config,
        orchestrator: &orchestrator,
    };
    match handler.set(&value, &mut ctx) {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => exit_with(err),
    }
}

fn handle_unset(config_path: &Path, key: &str, value: Option<&str>) -> Result<(), Box<dyn Error>> {
    let orchestrator = ConfigOrchestrator::new(config_path.to_path_buf());
    let config = orchestrator.load_with_cache()?;
    let registry = SettingRegistry::new();

    let Some(handler) = registry.get(key) else {
        exit_with(SettingError::UnknownKey(key.to_string()));
    };

    let mut ctx = SetContext {
        config: &config,
        orchestrator: &orchestrator,
    };
    match handler.unset(value, &mut ctx) {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => exit_with(err),
    }
}

fn print_settings(registry: &SettingRegistry, config: &Config) {
    println!("Current configuration:");
    for key in registry.keys_display_order() {
        if let Some(handler) = registry.get(key) {
            println!("{}", handler.format(config));
        }
    }
}

fn exit_with(err: SettingError) -> ! {
    err.print();
    std::process::exit(err.exit_code());
}
