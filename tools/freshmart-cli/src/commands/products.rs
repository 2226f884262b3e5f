//! Catalog browsing commands.

use anyhow::Result;
use freshmart_commerce::catalog::{Product, ProductCatalog};
use freshmart_commerce::CommerceError;

use super::{ProductArgs, ProductsArgs};
use crate::context::Context;
use crate::output::{stock_badge, truncate};

const WIDTHS: [usize; 4] = [4, 28, 14, 14];

/// Run the products command.
pub async fn list(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;

    let mut products = match &args.search {
        Some(term) => catalog.search(term),
        None => catalog.products(),
    };
    if args.in_stock {
        products.retain(Product::is_in_stock);
    }

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    ctx.output.header("Products");
    ctx.output.table_row(&["ID", "NAME", "PRICE", "STOCK"], &WIDTHS);
    for p in &products {
        ctx.output.table_row(
            &[
                p.id.as_str(),
                &truncate(&p.name, WIDTHS[1]),
                &p.price.display(),
                &stock_badge(p.stock),
            ],
            &WIDTHS,
        );
    }
    ctx.output.info(&format!("{} product(s)", products.len()));

    Ok(())
}

/// Run the product command.
pub async fn show(args: ProductArgs, ctx: &Context) -> Result<()> {
    let product = find(ctx, &args.slug)?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Slug", &product.slug);
    ctx.output.kv("Price", &product.price.display());
    ctx.output.kv("Stock", &stock_badge(product.stock));
    if let Some(brand) = &product.brand {
        ctx.output.kv("Brand", brand);
    }
    if let Some(image) = &product.image {
        ctx.output.kv("Image", image);
    }

    Ok(())
}

/// Look up a product by slug.
pub fn find(ctx: &Context, slug: &str) -> Result<Product> {
    ctx.catalog()?
        .product_by_slug(slug)
        .ok_or_else(|| CommerceError::ProductNotFound(slug.to_string()).into())
}
