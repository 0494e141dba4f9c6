use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::commands::{
    LsOptions, cmd_config_set, cmd_config_show, cmd_create, cmd_delete, cmd_login, cmd_logout,
    cmd_ls, cmd_update, cmd_whoami,
};
use crate::entity::{EntityKind, RecordId};

#[derive(Parser)]
#[command(name = "steward")]
#[command(about = "Browse and edit asset and HR records")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List one kind of record, resuming the last page or search
    #[command(visible_alias = "l")]
    Ls {
        /// Record kind (departments, employees, owners, suppliers, assets)
        kind: EntityKind,

        /// Page to show (ignored while searching)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,

        /// Filter across the whole collection
        #[arg(short, long)]
        search: Option<String>,

        /// Start from page 1 without a search, ignoring the saved view
        #[arg(long, conflicts_with_all = ["page", "search"])]
        fresh: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a record, then show the first page
    #[command(visible_alias = "c")]
    Create {
        /// Record kind
        kind: EntityKind,

        /// Record fields as a JSON object, e.g. '{"name":"Finance"}'
        #[arg(short, long)]
        data: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace a record's fields, then refresh the current view
    Update {
        /// Record kind
        kind: EntityKind,

        /// Record ID
        #[arg(value_parser = parse_record_id)]
        id: RecordId,

        /// Record fields as a JSON object
        #[arg(short, long)]
        data: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a record, then refresh the current view
    #[command(visible_alias = "rm")]
    Delete {
        /// Record kind
        kind: EntityKind,

        /// Record ID
        #[arg(value_parser = parse_record_id)]
        id: RecordId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in on this machine
    Login {
        /// Username to sign in as
        username: String,
    },

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        /// base_url, request_timeout, search_debounce_ms, logging.level,
        /// logging.format or page_size.<kind>
        key: String,

        /// Value to set
        value: String,
    },
}

impl Commands {
    /// Run the command
    pub async fn run(self) -> crate::error::Result<()> {
        match self {
            Commands::Ls {
                kind,
                page,
                search,
                fresh,
                json,
            } => {
                cmd_ls(LsOptions {
                    kind,
                    page,
                    search,
                    fresh,
                    json,
                })
                .await
            }

            Commands::Create { kind, data, json } => cmd_create(kind, &data, json).await,
            Commands::Update {
                kind,
                id,
                data,
                json,
            } => cmd_update(kind, &id, &data, json).await,
            Commands::Delete { kind, id, json } => cmd_delete(kind, &id, json).await,

            Commands::Login { username } => cmd_login(&username),
            Commands::Logout => cmd_logout(),
            Commands::Whoami { json } => cmd_whoami(json),

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value } => cmd_config_set(&key, &value),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn parse_record_id(s: &str) -> Result<RecordId, String> {
    s.parse().map_err(|e: crate::error::StewardError| e.to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "steward", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ls_accepts_singular_kind() {
        let cli = Cli::try_parse_from(["steward", "ls", "employee", "--page", "2"]).unwrap();
        match cli.command {
            Commands::Ls { kind, page, .. } => {
                assert_eq!(kind, EntityKind::Employees);
                assert_eq!(page, Some(2));
            }
            _ => panic!("expected ls"),
        }
    }

    #[test]
    fn test_ls_rejects_page_zero() {
        assert!(Cli::try_parse_from(["steward", "ls", "owners", "--page", "0"]).is_err());
    }

    #[test]
    fn test_fresh_conflicts_with_search() {
        assert!(
            Cli::try_parse_from(["steward", "ls", "owners", "--fresh", "--search", "x"]).is_err()
        );
    }

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id("42").unwrap(), RecordId::from(42));
        assert!(parse_record_id("a/b").is_err());
    }
}
