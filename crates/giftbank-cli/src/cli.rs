use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for the `giftbank` binary.
#[derive(Debug, Parser)]
#[command(
    name = "giftbank",
    version,
    about = "Question banks in Moodle GIFT format"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ~/.config/giftbank/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding bank data, overriding the config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose mode (info logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check a GIFT file and report problems by line
    Validate(ValidateArgs),
    /// Import a GIFT file into a bank
    Import(ImportArgs),
    /// Write a bank, or one category subtree, as GIFT
    Export(ExportArgs),
    /// Show the category tree with question previews
    List(ListArgs),
    /// Manage banks
    Bank {
        #[command(subcommand)]
        action: BankCommands,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// GIFT file to check
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// GIFT file to import
    pub file: PathBuf,

    /// Target bank id (defaults to the active bank)
    #[arg(long)]
    pub bank: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Source bank id (defaults to the active bank)
    #[arg(long)]
    pub bank: Option<String>,

    /// Export only this category id and its descendants
    #[arg(long)]
    pub category: Option<String>,

    /// Path prepended to every $CATEGORY line, overriding the config file
    #[arg(long)]
    pub context_prefix: Option<String>,

    /// Output file, or a directory to write `<bank name>.gift.txt` into
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Bank id (defaults to the active bank)
    #[arg(long)]
    pub bank: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum BankCommands {
    /// List banks; the active one is marked with `*`
    List,
    /// Create a bank and make it active
    Create { name: String },
    /// Rename a bank
    Rename { id: String, name: String },
    /// Delete a bank and its data
    Delete { id: String },
    /// Make a bank the active one
    Use { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write the effective settings to the config file
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::{BankCommands, Cli, Commands, ConfigCommands};

    #[test]
    fn test_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "giftbank",
            "export",
            "--category",
            "c1",
            "--data-dir",
            "/tmp/banks",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.data_dir.as_deref(), Some(Path::new("/tmp/banks")));
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.category.as_deref(), Some("c1"));
        assert!(args.output.is_none());
    }

    #[test]
    fn test_bank_subcommands() {
        let cli = Cli::try_parse_from(["giftbank", "bank", "rename", "b1", "Physics"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Bank {
                action: BankCommands::Rename { ref id, ref name }
            } if id == "b1" && name == "Physics"
        ));
    }

    #[test]
    fn test_config_init_force_flag() {
        let cli = Cli::try_parse_from(["giftbank", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigCommands::Init { force: true }
            }
        ));
    }

    #[test]
    fn test_validate_requires_file() {
        assert!(Cli::try_parse_from(["giftbank", "validate"]).is_err());
    }
}
