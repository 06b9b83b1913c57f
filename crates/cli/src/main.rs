mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use weir_core::ComponentKind;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Component selector for `weir parts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ComponentArg {
    #[value(name = "control-1d")]
    Control1D,
    #[value(name = "control-2d")]
    Control2D,
    Geometry,
    Boundary,
}

impl From<ComponentArg> for ComponentKind {
    fn from(arg: ComponentArg) -> Self {
        match arg {
            ComponentArg::Control1D => ComponentKind::Control1D,
            ComponentArg::Control2D => ComponentKind::Control2D,
            ComponentArg::Geometry => ComponentKind::Geometry,
            ComponentArg::Boundary => ComponentKind::Boundary,
        }
    }
}

/// Hydraulic model control-file loader.
#[derive(Parser)]
#[command(name = "weir", version, about = "Hydraulic model control-file loader")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log weir internals at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML file with default load options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand that runs a load.
#[derive(Args, Debug, Clone)]
pub(crate) struct LoadArgs {
    /// Path to the root control file (.tcf, .ecf, .tgc or .tbc)
    pub root: PathBuf,

    /// Scenario/event string, e.g. "s1 BAS s2 5m e1 Q0100"
    #[arg(long = "se")]
    pub scenarios: Option<String>,

    /// Variable binding NAME=VALUE; overrides Set Variable (repeatable)
    #[arg(long = "var", value_parser = parse_var)]
    pub variables: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a model and print it (json) or a per-component summary (text)
    Load {
        #[command(flatten)]
        args: LoadArgs,
        /// Check that attached files and their sidecars exist
        #[arg(long)]
        check_files: bool,
    },

    /// Print the discovered control-file tree
    Files {
        #[command(flatten)]
        args: LoadArgs,
    },

    /// List resolved parts
    Parts {
        #[command(flatten)]
        args: LoadArgs,
        /// Only list parts of this component
        #[arg(long, value_enum)]
        component: Option<ComponentArg>,
        /// Include parts excluded by scenario/event logic
        #[arg(long)]
        all: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let base = match &cli.config {
        Some(path) => match config::read_config(path) {
            Ok(options) => {
                debug!(path = %path.display(), "read config");
                options
            }
            Err(msg) => {
                report_error(&msg, cli.output, cli.quiet);
                process::exit(1);
            }
        },
        None => Default::default(),
    };

    match cli.command {
        Commands::Load { args, check_files } => {
            let options = config::merge(base, &args, check_files);
            commands::load::cmd_load(&args.root, &options, cli.output, cli.quiet);
        }
        Commands::Files { args } => {
            let options = config::merge(base, &args, false);
            commands::files::cmd_files(&args.root, &options, cli.output, cli.quiet);
        }
        Commands::Parts {
            args,
            component,
            all,
        } => {
            let options = config::merge(base, &args, false);
            commands::parts::cmd_parts(
                &args.root,
                &options,
                component.map(ComponentKind::from),
                all,
                cli.output,
                cli.quiet,
            );
        }
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Report a fatal load error and exit with status 1.
pub(crate) fn fail_load(e: &weir_core::LoadError, output: OutputFormat, quiet: bool) -> ! {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", e);
            }
        }
    }
    process::exit(1);
}
