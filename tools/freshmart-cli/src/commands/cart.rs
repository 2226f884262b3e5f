//! Cart commands.

use anyhow::{Context as _, Result};
use freshmart_commerce::cart::{Cart, CartEventKind, CartRepository, CartStore, CartSummary};
use freshmart_commerce::catalog::ProductCatalog;
use serde::Serialize;

use super::products::find;
use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

const WIDTHS: [usize; 5] = [3, 28, 5, 14, 14];

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.cart_store()?;

    let output = ctx.output.clone();
    store.subscribe(move |event, _| {
        let change = match &event.kind {
            CartEventKind::Added { product_id, quantity } => {
                format!("{} now x{}", product_id, quantity)
            }
            CartEventKind::Updated { product_id, quantity } => {
                format!("{} set to x{}", product_id, quantity)
            }
            CartEventKind::Removed { product_id } => format!("{} removed", product_id),
            CartEventKind::Cleared => "cart cleared".to_string(),
        };
        output.debug(&format!(
            "{} ({} item(s), {})",
            change,
            event.summary.total_items,
            event.summary.total_price.display()
        ));
    });

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add { slug, quantity } => {
            let product = find(ctx, &slug)?;
            let before = store.line(&product.id).map_or(0, |l| l.quantity);
            store
                .add_to_cart(&product, quantity)
                .context("Cart updated but not saved")?;
            let after = store.line(&product.id).map_or(0, |l| l.quantity);

            if after == before {
                ctx.output.warn(&format!("{} not added (stock: {})", product.name, product.stock));
            } else if after - before < quantity {
                ctx.output.warn(&format!(
                    "Only {} of {} in stock; cart holds {}",
                    product.stock, product.name, after
                ));
            } else {
                ctx.output.success(&format!("Added {} x {}", quantity, product.name));
            }
        }
        CartCommand::Remove { slug } => {
            let product = find(ctx, &slug)?;
            if store.line(&product.id).is_none() {
                ctx.output.info(&format!("{} is not in the cart", product.name));
            }
            store
                .remove_from_cart(&product.id)
                .context("Cart updated but not saved")?;
        }
        CartCommand::Set { slug, quantity } => {
            let product = find(ctx, &slug)?;
            if store.line(&product.id).is_none() {
                ctx.output.info(&format!("{} is not in the cart", product.name));
            }
            store
                .update_quantity(&product.id, quantity)
                .context("Cart updated but not saved")?;
        }
        CartCommand::Clear => {
            store.clear_cart().context("Cart cleared but not saved")?;
            ctx.output.success("Cart cleared");
        }
    }

    print_cart(&store, ctx)
}

#[derive(Serialize)]
struct CartView<'a> {
    session: String,
    lines: &'a Cart,
    #[serde(flatten)]
    summary: CartSummary,
}

/// Print the cart table and totals.
pub fn print_cart<R: CartRepository>(store: &CartStore<R>, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            session: ctx.current_session()?.to_string(),
            lines: store.cart(),
            summary: store.summary(),
        });
        return Ok(());
    }

    if store.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    // Prices may have changed since items were added
    let catalog = ctx.catalog().ok();

    ctx.output.header("Cart");
    ctx.output.table_row(&["#", "PRODUCT", "QTY", "UNIT PRICE", "TOTAL"], &WIDTHS);
    for (i, line) in store.cart().lines().iter().enumerate() {
        ctx.output.table_row(
            &[
                &(i + 1).to_string(),
                &truncate(&line.product.name, WIDTHS[1]),
                &line.quantity.to_string(),
                &line.unit_price().display(),
                &line.line_total().display(),
            ],
            &WIDTHS,
        );
        let current = catalog
            .as_ref()
            .and_then(|c| c.product_by_id(&line.product.id))
            .filter(|p| p.price != line.product.price);
        if let Some(current) = current {
            ctx.output.debug(&format!(
                "{} now costs {}; cart keeps {}",
                line.product.name,
                current.price.display(),
                line.unit_price().display()
            ));
        }
    }

    let summary = store.summary();
    ctx.output.kv("Items", &summary.total_items.to_string());
    ctx.output.kv("Total", &summary.total_price.display());

    Ok(())
}
