//! Catalog lookup commands and product table rendering

use crate::api::{BackendClient, Product};
use crate::config::Config;
use crate::error::Result;

use colored::Colorize;
use prettytable::{row, Table};

/// Renders a product list as a table
pub(crate) fn product_table(products: &[Product]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "ID", "Title", "Brand", "Category", "Price"]);
    for (idx, product) in products.iter().enumerate() {
        table.add_row(row![
            idx + 1,
            product.id,
            product.title,
            product.brand,
            product.category,
            format!("{:.2} {}", product.price, product.currency),
        ]);
    }
    table
}

/// Show catalog metadata (`shopchat meta`)
pub async fn show_meta(config: Config) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let meta = client.meta().await?;

    println!("{}", "Catalog".bold());
    println!("  brands:     {}", meta.brands.join(", "));
    println!("  categories: {}", meta.categories.join(", "));
    println!("  price:      {:.2} - {:.2}", meta.price_min, meta.price_max);
    Ok(())
}

/// Check backend connectivity (`shopchat health`)
pub async fn check_health(config: Config) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    match client.health().await {
        Ok(health) => {
            println!("{} {}", "Backend reachable:".green(), health);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Backend unreachable:".red(), e);
            Err(e)
        }
    }
}

/// Show one product (`shopchat product <id>`)
pub async fn show_product(config: Config, id: &str) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let product = client.product(id).await?;

    println!("{}", product.title.bold());
    println!("  id:       {}", product.id);
    println!("  brand:    {}", product.brand);
    println!("  category: {}", product.category);
    println!("  price:    {:.2} {}", product.price, product.currency);
    if !product.tags.is_empty() {
        println!("  tags:     {}", product.tags);
    }
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }
    if let Some(url) = &product.product_url {
        println!("\n  {}", url.underline());
    }
    Ok(())
}

/// Show products similar to one product (`shopchat similar <id>`)
pub async fn show_similar(config: Config, id: &str, top_k: u32) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let products = client.similar(id, top_k).await?;

    if products.is_empty() {
        println!("No similar products found for {}", id);
        return Ok(());
    }
    println!("{}", format!("Similar to {}:", id).bold());
    product_table(&products).printstd();
    Ok(())
}
