//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod products;
pub mod session;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Only products whose name or brand contains this text.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Hide products that are out of stock.
    #[arg(long)]
    pub in_stock: bool,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product slug.
    pub slug: String,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    Show,
    /// Add a product to the cart.
    Add {
        /// Product slug.
        slug: String,
        /// Units to add.
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart.
    Remove {
        /// Product slug.
        slug: String,
    },
    /// Set the quantity of a product already in the cart.
    Set {
        /// Product slug.
        slug: String,
        /// New quantity; 0 or less removes the product.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every product from the cart.
    Clear,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Customer full name.
    #[arg(long)]
    pub name: String,

    /// Customer email.
    #[arg(long)]
    pub email: String,

    /// Customer phone number.
    #[arg(long)]
    pub phone: String,

    /// Delivery address.
    #[arg(long)]
    pub address: String,
}

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: Option<SessionCommand>,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Show the active session.
    Show,
    /// Start a new session with an empty cart.
    New,
    /// End the active session and delete its storage.
    End,
}
