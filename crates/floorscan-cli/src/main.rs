mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::analyze::Part;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "floorscan",
    version,
    about = "Read lines, drawing scale and room sizes out of floor-plan text and geometry"
)]
struct Cli {
    /// JSON configuration file (defaults are used for anything it leaves out)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group OCR fragments into lines and phrases
    Cluster {
        /// Floor-plan input document (JSON)
        input_file: PathBuf,

        /// Group by distance between fragment centers instead of by rows
        #[arg(long)]
        freeform: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Infer the drawing scale from page text or OCR fragments
    Scale {
        /// Floor-plan input document (JSON)
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Match room labels to polygons and compute room sizes
    Match {
        /// Floor-plan input document (JSON)
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Run clustering, scale inference and room matching together
    Analyze {
        /// Floor-plan input document (JSON)
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the analysis as JSON to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Infer the scale of every page of a vector PDF (requires pdftotext)
    Scales {
        /// Path to PDF file
        pdf_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Print the effective configuration as JSON
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Cluster {
            input_file,
            freeform,
            output,
        } => commands::cluster::run(&input_file, config_path, freeform, &output),
        Commands::Scale { input_file, output } => {
            commands::analyze::run(&input_file, config_path, Part::Scale, &output, None)
        }
        Commands::Match { input_file, output } => {
            commands::analyze::run(&input_file, config_path, Part::Rooms, &output, None)
        }
        Commands::Analyze {
            input_file,
            output,
            out,
        } => commands::analyze::run(&input_file, config_path, Part::All, &output, out),
        Commands::Scales { pdf_file, output } => {
            commands::scales::run(&pdf_file, config_path, &output)
        }
        Commands::Config => commands::config::show(config_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
