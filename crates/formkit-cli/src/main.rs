mod commands;
mod reader;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "formkit",
    version,
    about = "formkit schema toolkit: check form schemas, normalize and transform form values"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check form schemas for structural errors and report diagnostics
    Check {
        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },

    /// Lint form schemas for style and usability issues
    Lint {
        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: human (default), json or sarif
        #[arg(long, default_value = "human")]
        format: String,
    },

    /// Repair stored values into the shapes the schema expects
    Normalize {
        /// Schema file (.json, .yaml or .yml)
        schema: PathBuf,

        /// Values JSON file
        values: PathBuf,
    },

    /// Coerce values into the submit payload
    Transform {
        /// Schema file (.json, .yaml or .yml)
        schema: PathBuf,

        /// Values JSON file
        values: PathBuf,
    },

    /// Print the default value of every field
    Defaults {
        /// Schema file (.json, .yaml or .yml)
        schema: PathBuf,
    },

    /// Print the validation rules derived for each field
    Rules {
        /// Schema file (.json, .yaml or .yml)
        schema: PathBuf,
    },

    /// Render values read-only, as display text
    View {
        /// Schema file (.json, .yaml or .yml)
        schema: PathBuf,

        /// Values JSON file
        values: PathBuf,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FORMKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            path,
            strict,
            format,
        } => match commands::check::run_check(&path, strict, &format) {
            Ok((output, failed)) => {
                println!("{output}");
                if failed {
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        Commands::Lint { path, format } => print_or_exit(commands::lint::run_lint(&path, &format)),
        Commands::Normalize { schema, values } => {
            print_or_exit(commands::values::run_normalize(&schema, &values))
        }
        Commands::Transform { schema, values } => {
            print_or_exit(commands::values::run_transform(&schema, &values))
        }
        Commands::Defaults { schema } => print_or_exit(commands::values::run_defaults(&schema)),
        Commands::Rules { schema } => print_or_exit(commands::rules::run_rules(&schema)),
        Commands::View {
            schema,
            values,
            format,
        } => print_or_exit(commands::view::run_view(&schema, &values, &format)),
    }
}

fn print_or_exit(result: Result<String, String>) {
    match result {
        Ok(output) => {
            println!("{output}");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
