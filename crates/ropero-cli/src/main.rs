mod products;

use clap::{Parser, Subcommand};
use ropero_core::Role;
use tracing_subscriber::EnvFilter;

use crate::products::ProductsCommands;

#[derive(Debug, Parser)]
#[command(name = "ropero-cli")]
#[command(about = "Ropero catalog command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read or clear the product sheet
    Products {
        /// Role whose sheet to use (admin, eu, col)
        #[arg(long, global = true, default_value = "admin")]
        role: Role,
        #[command(subcommand)]
        command: ProductsCommands,
    },
    /// Suggest a clothing type for a product name
    Infer {
        /// Product name, e.g. "Pantalón de pana"
        name: String,
    },
    /// Print the clothing type table with required measurements
    Taxonomy,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Products { role, command } => {
            let config = ropero_core::load_app_config()?;
            products::run(&config, role, command).await?;
        }
        Commands::Infer { name } => match ropero_core::infer_type(&name) {
            Some(clothing_type) => {
                println!("{} ({})", clothing_type.as_str(), clothing_type.label());
            }
            None => println!("no match"),
        },
        Commands::Taxonomy => print_taxonomy(),
    }

    Ok(())
}

fn print_taxonomy() {
    for info in ropero_core::CLOTHING_TYPES {
        let measurements: Vec<&str> = info.measurements.iter().map(|m| m.as_str()).collect();
        println!(
            "{:<12} {:<14} {:<6} {}",
            info.value.as_str(),
            info.label,
            info.category.as_str(),
            measurements.join(", ")
        );
    }
}
