//! tabattr CLI - read spreadsheet and CSV selections by name

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabattr_core::{AttributeFactory, TabattrConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabattr")]
#[command(author, version, about = "Read tabular file selections as typed values", long_about = None)]
struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read an attribute and print its value
    Read {
        /// Attribute name, e.g. pds:/data/run.csv::["temp"]
        name: String,
        /// Always re-read the file
        #[arg(long)]
        no_cache: bool,
        /// Print the value as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the complete, normal and short forms of an attribute name
    Names {
        name: String,
    },
    /// List registered schemes and file extensions
    Formats,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => TabattrConfig::from_file(path)?,
        None => TabattrConfig::default(),
    };
    let factory = AttributeFactory::new(config)?;

    match cli.command {
        Command::Read {
            name,
            no_cache,
            json,
        } => {
            let attribute = factory.attribute(&name)?;
            let value = attribute.read(!no_cache)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", value.rvalue);
            }
        }
        Command::Names { name } => {
            let names = factory.validator().parse_attribute(&name)?.names();
            println!("complete: {}", names.complete);
            println!("normal:   {}", names.normal);
            println!("short:    {}", names.short);
        }
        Command::Formats => {
            let registry = factory.registry();
            println!("{} (by extension)", registry.generic_scheme());
            for (scheme, driver) in registry.drivers() {
                println!("{:<10} {:<12} {}", scheme, driver.format_name(), driver.extensions().join(" "));
            }
        }
    }

    Ok(())
}
