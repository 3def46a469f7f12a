//! `products` subcommands. All of them talk to the live spreadsheet.

use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use ropero_core::{create_product_description, format_price, AppConfig, Role};
use ropero_store::{GoogleSheetsClient, ProductService, ProductSheet, SheetStore};

#[derive(Debug, Subcommand)]
pub enum ProductsCommands {
    /// List products in the sheet
    List,
    /// Print the marketplace listing text for one product
    Describe {
        /// Product id (column A)
        id: String,
    },
    /// Delete every product row, keeping the header
    Clear {
        /// Confirm the irreversible delete
        #[arg(long)]
        yes: bool,
    },
}

/// # Errors
///
/// Returns an error if the Sheets client cannot be built or a request fails.
pub(crate) async fn run(
    config: &AppConfig,
    role: Role,
    command: ProductsCommands,
) -> anyhow::Result<()> {
    let sheets: Arc<dyn SheetStore> = Arc::new(
        GoogleSheetsClient::from_config(&config.sheets)
            .context("failed to build Google Sheets client")?,
    );
    let service = ProductService::new(sheets);

    match command {
        ProductsCommands::List => {
            let products = service.list_products(role).await?;
            for product in &products {
                println!(
                    "{:<36}  {:<10}  {:>8}  {}",
                    product.id,
                    product.clothing_type,
                    format_price(product.price),
                    product.name
                );
            }
            println!("{} product(s)", products.len());
        }
        ProductsCommands::Describe { id } => {
            let product = service.find_product(role, &id).await?;
            print!("{}", create_product_description(&product));
        }
        ProductsCommands::Clear { yes } => {
            let sheet = ProductSheet::for_role(role);
            if !yes {
                anyhow::bail!("refusing to clear {sheet} without --yes");
            }
            service.delete_all_products(sheet).await?;
            println!("cleared {}", sheet.data_range());
        }
    }

    Ok(())
}
