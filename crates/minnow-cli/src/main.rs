#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::struct_excessive_bools)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "minnow")]
#[command(author, version, about = "Shrink TypeScript compiler output", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit a JSON report on stdout and JSON logs on stderr
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Remove whitespace and comments from a JavaScript file
    Strip {
        /// File to compact
        file: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Mangle identifiers and remove whitespace using a semantic model
    Minify {
        /// Emitted JavaScript for the unit
        file: PathBuf,

        /// JSON semantic model describing the unit
        #[arg(long, value_name = "PATH")]
        model: PathBuf,

        /// JSON options file (`mangleIdentifiers`, `removeWhitespace`, `externalNamespace`)
        #[arg(long, value_name = "PATH")]
        options: Option<PathBuf>,

        /// Keep identifier names
        #[arg(long)]
        no_mangle: bool,

        /// Keep whitespace
        #[arg(long)]
        no_whitespace: bool,

        /// Treat functions in any other namespace as external
        #[arg(long, value_name = "NAME")]
        external_namespace: Option<String>,

        /// Write the result here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    match cli.command {
        Commands::Strip { file, output } => commands::strip::run(&file, output.as_deref(), cli.json),
        Commands::Minify {
            file,
            model,
            options,
            no_mangle,
            no_whitespace,
            external_namespace,
            output,
        } => commands::minify::run(
            commands::minify::MinifyAction {
                file,
                model,
                options,
                no_mangle,
                no_whitespace,
                external_namespace,
                output,
            },
            cli.json,
        ),
    }
}
