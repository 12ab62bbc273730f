//! `abac-policy`: compile, render and hydrate ABAC policy documents from the command line.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use abac_policy_compiler::{PolicyCompilerError, DEFAULT_DESCRIPTION};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;

#[derive(Debug, Parser)]
#[command(
    name = "abac-policy",
    version,
    about = "Compile wizard selections into ABAC policy documents, render them as English, and hydrate them back."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct ContextArgs {
    /// Attribute catalog JSON file
    #[arg(long, env = "ABAC_CATALOG")]
    catalog: Option<PathBuf>,

    /// Entity directory JSON file with display names
    #[arg(long, env = "ABAC_DIRECTORY")]
    directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RuleIds {
    /// Millisecond timestamp per compile
    Timestamp,
    /// Random uuid per compile
    Uuid,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemaKind {
    Document,
    Selection,
    Catalog,
    Directory,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compile a selection into a policy document
    Compile {
        /// Selection state JSON file, or '-' for stdin
        #[arg(short, long)]
        selection: PathBuf,

        #[command(flatten)]
        context: ContextArgs,

        /// How rule ids are generated
        #[arg(long, value_enum, env = "ABAC_RULE_IDS", default_value_t = RuleIds::Timestamp)]
        rule_ids: RuleIds,

        /// Description used when the selection has none
        #[arg(long, default_value = DEFAULT_DESCRIPTION)]
        default_description: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Render a selection as an English sentence
    Render {
        /// Selection state JSON file, or '-' for stdin
        #[arg(short, long)]
        selection: PathBuf,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Rebuild a selection from a stored policy document
    Hydrate {
        /// Policy document JSON file, or '-' for stdin
        #[arg(short, long)]
        document: PathBuf,

        /// Attribute catalog JSON file
        #[arg(long, env = "ABAC_CATALOG")]
        catalog: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the JSON schema of an input or output type
    Schema {
        #[arg(value_enum)]
        kind: SchemaKind,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("{:?}", cli.command);

    match commands::run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let incomplete = error
                .downcast_ref::<PolicyCompilerError>()
                .and_then(PolicyCompilerError::incomplete_selection);
            match incomplete {
                Some(reason) => {
                    eprintln!("Cannot compile policy: {reason}");
                    ExitCode::from(2)
                }
                None => {
                    eprintln!("Error: {error:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
