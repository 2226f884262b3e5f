//! Checkout command.

use anyhow::Result;
use freshmart_commerce::checkout::{Checkout, CustomerInfo};

use super::cart::print_cart;
use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.cart_store()?;
    let customer = CustomerInfo::new(args.name, args.email, args.phone, args.address);

    if !ctx.output.is_json() {
        print_cart(&store, ctx)?;
    }

    let checkout = Checkout::simulated(&ctx.config.checkout);
    let spinner = ctx.output.spinner("Processing payment...");
    let result = checkout.place_order(&mut store, customer).await;
    spinner.finish_and_clear();

    let receipt = result?;

    if ctx.output.is_json() {
        ctx.output.json(&receipt);
        return Ok(());
    }

    ctx.output.success(&format!("Order {} placed", receipt.order.order_number));
    ctx.output.block(&receipt.render_invoice());
    if !store.is_empty() {
        ctx.output.warn("Cart could not be emptied in storage");
    }

    Ok(())
}
