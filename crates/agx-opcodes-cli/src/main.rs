//! AGX opcode header generator CLI.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use agx_opcodes::{ImmediateBits, OpcodeSchema, generate_header, validate};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agx-opcodes")]
#[command(about = "Generate the AGX opcode header from an opcode schema")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the C header
    Generate {
        /// Schema file (TOML, or JSON with a .json extension)
        schema: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a schema without generating anything
    Check {
        /// Schema file
        schema: PathBuf,
    },

    /// Print the immediate flag bit assignment
    Immediates {
        /// Schema file
        schema: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the header can be piped from stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("agx_opcodes=info".parse()?))
        .init();

    match cli.command {
        Commands::Generate { schema, output } => {
            info!("Loading schema {}", schema.display());
            let schema = OpcodeSchema::from_file(&schema)?;
            let header = generate_header(&schema)?;

            if let Some(path) = output {
                std::fs::write(&path, &header)?;
                info!(
                    "Wrote {} ({} opcodes, {} immediates, {} enums)",
                    path.display(),
                    schema.opcodes.len(),
                    schema.immediates.len(),
                    schema.enums.len()
                );
            } else {
                std::io::stdout().lock().write_all(header.as_bytes())?;
            }
        }

        Commands::Check { schema: path } => {
            let schema = OpcodeSchema::from_file(&path)?;
            validate(&schema)?;
            println!(
                "{}: ok ({} opcodes, {} immediates, {} enums)",
                path.display(),
                schema.opcodes.len(),
                schema.immediates.len(),
                schema.enums.len()
            );
        }

        Commands::Immediates { schema } => {
            let schema = OpcodeSchema::from_file(&schema)?;
            validate(&schema)?;
            let bits = ImmediateBits::allocate(&schema.immediates)?;
            let mut stdout = std::io::stdout().lock();
            for (index, (kind, bit)) in bits.iter().enumerate() {
                writeln!(stdout, "{:>2}  {:#018x}  {}", index, bit, kind)?;
            }
            writeln!(stdout, "used mask: {:#018x}", bits.used_mask())?;
        }
    }

    Ok(())
}
