//! Catalog browsing commands.

use abyssinia_commerce::catalog::{Category, Product};
use abyssinia_commerce::ids::ProductId;
use anyhow::{anyhow, Result};
use console::style;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::List { category, search } => {
            list_products(category.as_deref(), search.as_deref(), ctx)
        }
        CatalogCommand::Show { id } => show_product(&id, ctx),
    }
}

/// Parse a `--category` value.
pub fn parse_category(value: &str) -> Result<Category> {
    Category::parse(value).ok_or_else(|| {
        anyhow!(
            "Unknown category '{}'. Expected one of: clothes, art, misc, accessories",
            value
        )
    })
}

fn list_products(category: Option<&str>, search: Option<&str>, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let category = category.map(parse_category).transpose()?;
    let products = catalog.search(search.unwrap_or(""), category);

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    let title = category.map_or("All Products", |c| c.display_name());
    ctx.output.header(title);

    if products.is_empty() {
        ctx.output.info("No products match.");
        return Ok(());
    }

    ctx.output.table_row(&["ID", "NAME", "PRICE", "CATEGORY"], &[12, 28, 10, 24]);
    for product in &products {
        let price = product.price.to_string();
        let name = if product.in_stock {
            product.name.clone()
        } else {
            format!("{} {}", product.name, style("(sold out)").dim())
        };
        ctx.output.table_row(
            &[product.id.as_str(), &name, &price, product.category.display_name()],
            &[12, 28, 10, 24],
        );
    }
    ctx.output.info(&format!("{} product(s)", products.len()));
    Ok(())
}

fn show_product(id: &str, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let product = catalog.get(&ProductId::new(id))?;

    if ctx.output.is_json() {
        ctx.output.json(product);
        return Ok(());
    }

    print_product(product, ctx);
    Ok(())
}

/// Print a product's detail view.
pub fn print_product(product: &Product, ctx: &Context) {
    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Price", &product.price.to_string());
    ctx.output.kv("Category", product.category.display_name());
    ctx.output.kv("In stock", if product.in_stock { "yes" } else { "no" });
    if !product.description.is_empty() {
        ctx.output.kv("Description", &product.description);
    }
    if !product.detailed_history.is_empty() {
        ctx.output.kv("History", &product.detailed_history);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("art").unwrap(), Category::Art);
        assert_eq!(parse_category("misc").unwrap(), Category::Miscellaneous);
        assert!(parse_category("shoes").is_err());
    }
}
