#![forbid(unsafe_code)]
//! CXM Command Line Interface

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cxm::commands::{
    execute_explain, execute_init, execute_list, execute_plan, execute_validate,
    ExplainOptions, InitOptions, ListTarget, PlanOptions, ValidateOptions,
};
use cxm::config::CONFIG_FILE;
use cxm::{CliOverrides, Config, OutputFormat};

#[derive(Parser)]
#[command(name = "cxm")]
#[command(about = "Dynamic CX configuration matrix - rule-driven dashboard layouts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Flags shared by commands that evaluate a sheet
#[derive(Args, Debug, Clone, Default)]
struct SelectionArgs {
    /// Rule table workbook (.json, .yaml); defaults to the built-in matrix
    #[arg(long, env = "CXM_WORKBOOK")]
    workbook: Option<PathBuf>,

    /// Sheet key (customer type / fuel / meter)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Selected customer attribute (repeatable)
    #[arg(short = 'a', long = "attribute")]
    attributes: Vec<String>,

    /// Widget to hide regardless of attributes (repeatable)
    #[arg(short, long)]
    kill: Vec<String>,

    /// Drop sections missing from the configured section order
    #[arg(long)]
    drop_unlisted: bool,
}

impl From<SelectionArgs> for CliOverrides {
    fn from(args: SelectionArgs) -> Self {
        CliOverrides {
            workbook: args.workbook,
            sheet: args.sheet,
            attributes: args.attributes,
            kill: args.kill,
            drop_unlisted: args.drop_unlisted,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a project config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Workbook to reference from the new config
        #[arg(long)]
        workbook: Option<PathBuf>,
    },

    /// Compute the ordered, sectioned widget plan
    Plan {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format (text, markdown, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show why each widget is included or not
    Explain {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format (text, markdown, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only show hidden widgets
        #[arg(long)]
        hidden: bool,
    },

    /// List sheets, attributes or widgets
    List {
        /// What to list (sheets, attributes, widgets)
        #[arg(default_value = "sheets")]
        target: ListTarget,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Validate a rule table workbook
    Validate {
        /// Workbook file
        file: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path, selection: SelectionArgs) -> anyhow::Result<Config> {
    let mut config = Config::load_layered(Some(path))?;
    config.apply_cli(&selection.into());
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { force, workbook } => {
            let options = InitOptions {
                force,
                path: cli.config,
                workbook,
            };
            execute_init(options)?;
        }

        Commands::Plan { selection, format } => {
            let config = load_config(&cli.config, selection)?;
            execute_plan(PlanOptions { format }, &config)?;
        }

        Commands::Explain {
            selection,
            format,
            hidden,
        } => {
            let config = load_config(&cli.config, selection)?;
            let options = ExplainOptions {
                format,
                hidden_only: hidden,
            };
            execute_explain(options, &config)?;
        }

        Commands::List { target, selection } => {
            let config = load_config(&cli.config, selection)?;
            execute_list(target, &config)?;
        }

        Commands::Validate { file, json } => {
            execute_validate(ValidateOptions { file, json })?;
        }
    }

    Ok(())
}
