use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use credcache_cli::config::{AppConfig, ConfigManager, get_config};
use credcache_core::{BackendKind, CredentialManager, CredentialType};
use std::io::Read;

#[derive(Parser)]
#[command(name = "credcache")]
#[command(author, version, long_about = None)]
#[command(about = "Credential cache - Inspect and manage cached driver tokens")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Override the configured credential backend
    #[arg(short, long, global = true, value_enum)]
    backend: Option<BackendArg>,

    #[command(subcommand)]
    command: Commands,
}

/// Credential triple addressing one cached token
#[derive(clap::Args)]
struct TripleArgs {
    /// Account host, e.g. myaccount.snowflakecomputing.com
    host: String,

    /// User name
    user: String,

    /// Credential type
    #[arg(short = 't', long = "type", default_value = CredentialType::IdToken.as_str())]
    cred_type: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cached token for a host and user
    Read {
        #[command(flatten)]
        triple: TripleArgs,
    },

    /// Cache a token for a host and user
    Write {
        #[command(flatten)]
        triple: TripleArgs,

        /// Token to cache; read from stdin when omitted
        token: Option<String>,
    },

    /// Remove the cached token for a host and user
    Remove {
        #[command(flatten)]
        triple: TripleArgs,
    },

    /// Print the composite key used by keychain and custom stores
    Key {
        #[command(flatten)]
        triple: TripleArgs,
    },

    /// Show which credential backend is in use
    Backend,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., cache.backend)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.backend)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,

    /// Print the configuration file path
    Path,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Auto,
    Native,
    Local,
    Disabled,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => BackendKind::Auto,
            BackendArg::Native => BackendKind::Native,
            BackendArg::Local => BackendKind::Local,
            BackendArg::Disabled => BackendKind::Disabled,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("credcache_core", log::LevelFilter::Debug)
            .filter_module("credcache_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match cli.command {
        Commands::Config { command } => config_command(command)?,
        Commands::Completions { shell } => generate_completions(shell),
        command => {
            let mut config = get_config()?;
            config.apply_cli_overrides(cli.backend.map(BackendKind::from));
            cache_command(config, command).await?;
        }
    }

    Ok(())
}

async fn cache_command(config: AppConfig, command: Commands) -> Result<()> {
    if let Commands::Key { triple } = &command {
        let key = config
            .cache
            .key_builder()
            .build_key(&triple.host, &triple.user, &triple.cred_type);
        println!("{key}");
        return Ok(());
    }

    let manager = CredentialManager::new(&config.cache)
        .await
        .context("Failed to open credential cache")?;
    log::debug!("Credential backend: {}", manager.backend_name());

    match command {
        Commands::Read { triple } => {
            let token = manager
                .read(triple.host.as_str(), triple.user.as_str(), triple.cred_type.as_str())
                .await
                .context("Failed to read credential")?;

            match token {
                Some(token) => println!("{token}"),
                None => {
                    eprintln!(
                        "{}",
                        format!(
                            "No {} cached for {}@{}",
                            triple.cred_type, triple.user, triple.host
                        )
                        .red()
                    );
                    std::process::exit(1);
                }
            }
        }
        Commands::Write { triple, token } => {
            let token = match token {
                Some(token) => token,
                None => read_token_from_stdin()?,
            };

            manager
                .write(
                    triple.host.as_str(),
                    triple.user.as_str(),
                    triple.cred_type.as_str(),
                    token.as_str(),
                )
                .await
                .context("Failed to write credential")?;
            eprintln!(
                "{}",
                format!(
                    "Cached {} for {}@{} ({})",
                    triple.cred_type,
                    triple.user,
                    triple.host,
                    manager.backend_name()
                )
                .green()
            );
        }
        Commands::Remove { triple } => {
            manager
                .remove(triple.host.as_str(), triple.user.as_str(), triple.cred_type.as_str())
                .await
                .context("Failed to remove credential")?;
            eprintln!(
                "{}",
                format!(
                    "Removed {} for {}@{}",
                    triple.cred_type, triple.user, triple.host
                )
                .green()
            );
        }
        Commands::Backend => println!("{}", manager.backend_name()),
        Commands::Key { .. } | Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}

fn read_token_from_stdin() -> Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read token from stdin")?;

    let token = input.trim_end_matches(['\r', '\n']);
    if token.is_empty() {
        anyhow::bail!("No token given on the command line or stdin");
    }
    Ok(token.to_string())
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => match manager.get(&key) {
            Ok(value) => {
                println!("{value}");
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::Set { key, value } => match manager.set(&key, &value) {
            Ok(()) => {
                eprintln!("{}", format!("Set {key} = {value}").green());
                eprintln!(
                    "Configuration saved to: {}",
                    manager.get_config_path().display()
                );
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::List => match manager.list() {
            Ok(items) => {
                eprintln!("{}", "Configuration:".bold().blue());
                eprintln!("Config file: {}", manager.get_config_path().display());
                eprintln!();

                for (key, value) in items {
                    println!("{} = {}", key.cyan(), value);
                }
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::Path => println!("{}", manager.get_config_path().display()),
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
