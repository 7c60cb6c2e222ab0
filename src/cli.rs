//! CLI front end for editing the shared command list.
//!
//! Stands in for the configuration GUI: every subcommand loads the stored
//! configuration, applies one edit, and saves the whole list back.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Command, Configuration, Options};
use crate::error::UnisearchError;
use crate::registry;
use crate::store::ConfigStore;

#[derive(Parser)]
#[command(name = "unisearch")]
#[command(about = "Open a search URL built from the selected text", long_about = None)]
pub struct Cli {
    /// Override the storage directory (defaults to the user config dir)
    #[arg(long, value_name = "DIR")]
    pub storage: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured commands with their indices
    List,

    /// Add a command to the end of the list
    Add {
        /// Menu label
        name: String,

        /// URL template containing the %s placeholder
        template: String,

        /// Escape regex metacharacters in the selection
        #[arg(long)]
        escape_regex: bool,

        /// Escape double quotes in the selection
        #[arg(long)]
        escape_quotes: bool,

        /// Strip the template's percent-encoding and encode the final url
        #[arg(long)]
        encode_full_url: bool,
    },

    /// Remove the command at the given index
    Remove { index: usize },

    /// Build (and open) the URL for a command with the given selection
    Open {
        index: usize,
        selection: String,

        /// Print the URL instead of opening it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the menu entries the extension would register
    Menu {
        /// Bundle identifier prefix for the entries
        #[arg(long, default_value = "com.unisearch.extension")]
        bundle_id: String,
    },

    /// Write the stored configuration to a JSON file
    Export { path: String },

    /// Append commands from a JSON file to the stored list
    Import { path: String },

    /// Delete the stored configuration
    Clear,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let store = match &cli.storage {
        Some(dir) => ConfigStore::at(PathBuf::from(shellexpand::tilde(dir).as_ref())),
        None => ConfigStore::new(),
    };

    match cli.command {
        Commands::List => {
            let commands = store.load()?.map(|c| c.commands).unwrap_or_default();
            if commands.is_empty() {
                println!("No commands configured");
            }
            for (index, command) in commands.iter().enumerate() {
                println!(
                    "{index}: {} -> {}{}",
                    command.name,
                    command.url_template,
                    describe_options(&command.options)
                );
            }
        }

        Commands::Add {
            name,
            template,
            escape_regex,
            escape_quotes,
            encode_full_url,
        } => {
            let mut commands = store.load()?.map(|c| c.commands).unwrap_or_default();
            commands.push(Command {
                name,
                url_template: template,
                options: Options {
                    should_escape_for_regex: escape_regex,
                    should_escape_double_quotes: escape_quotes,
                    should_percent_encode_full_url: encode_full_url,
                },
            });
            save_or_bail(&store, Configuration::new(commands))?;
        }

        Commands::Remove { index } => {
            let mut commands = store.load()?.map(|c| c.commands).unwrap_or_default();
            if index >= commands.len() {
                anyhow::bail!("no command at index {index}");
            }
            commands.remove(index);
            save_or_bail(&store, Configuration::new(commands))?;
        }

        Commands::Open {
            index,
            selection,
            dry_run,
        } => {
            let configuration = store.load()?.ok_or(UnisearchError::NoConfiguration)?;
            let built = registry::build_for_command(&configuration, index, &selection)?;
            if dry_run {
                println!("{built}");
            } else {
                registry::open_url(&built)?;
            }
        }

        Commands::Menu { bundle_id } => {
            for definition in registry::menu_definitions(&bundle_id, &store) {
                println!("{}\t{}", definition.identifier, definition.name);
            }
        }

        Commands::Export { path } => {
            let path = PathBuf::from(shellexpand::tilde(&path).as_ref());
            store.export_to(&path)?;
            println!("Exported configuration to {}", path.display());
        }

        Commands::Import { path } => {
            let path = PathBuf::from(shellexpand::tilde(&path).as_ref());
            let imported = store.import_from(&path)?.ok_or_else(|| {
                anyhow::anyhow!("could not read configuration from {}", path.display())
            })?;

            // Append semantics: the store never merges, the caller does
            let mut commands = store.load()?.map(|c| c.commands).unwrap_or_default();
            let count = imported.commands.len();
            commands.extend(imported.commands);
            save_or_bail(&store, Configuration::new(commands))?;
            println!("Imported {count} commands");
        }

        Commands::Clear => store.clear()?,
    }

    Ok(())
}

fn describe_options(options: &Options) -> String {
    let mut flags = Vec::new();
    if options.should_escape_for_regex {
        flags.push("escape-regex");
    }
    if options.should_escape_double_quotes {
        flags.push("escape-quotes");
    }
    if options.should_percent_encode_full_url {
        flags.push("encode-full-url");
    }

    if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    }
}

fn save_or_bail(store: &ConfigStore, configuration: Configuration) -> anyhow::Result<()> {
    if !store.save(&configuration) {
        anyhow::bail!("failed to save configuration");
    }
    Ok(())
}
