//! Order types built from a cart at checkout.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::CommerceError;
use crate::ids::{OrderNumber, ProductId};
use crate::money::Money;

/// Contact and delivery details collected by the checkout form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// Full name.
    pub customer_name: String,
    /// Email address.
    pub customer_email: String,
    /// Phone number.
    pub customer_phone: String,
    /// Delivery address.
    pub delivery_address: String,
}

impl CustomerInfo {
    /// Create customer details.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        delivery_address: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: name.into(),
            customer_email: email.into(),
            customer_phone: phone.into(),
            delivery_address: delivery_address.into(),
        }
    }

    /// Every field is required; blank fields are listed in the error.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let missing: Vec<&str> = [
            ("name", &self.customer_name),
            ("email", &self.customer_email),
            ("phone", &self.customer_phone),
            ("delivery address", &self.delivery_address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::Validation(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }
}

/// One purchased product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name at time of order.
    pub product_name: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price at time of order.
    pub price: Money,
    /// `price × quantity`.
    pub total: Money,
}

/// An order ready to be paid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Human-readable order number.
    pub order_number: OrderNumber,
    /// Who ordered and where to deliver.
    #[serde(flatten)]
    pub customer: CustomerInfo,
    /// Items in cart order.
    pub items: Vec<OrderItem>,
    /// Sum of item totals.
    pub total_amount: Money,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
}

impl OrderDraft {
    /// Snapshot `cart` into an order.
    pub fn from_cart(
        cart: &Cart,
        customer: CustomerInfo,
        placed_at: DateTime<Utc>,
    ) -> Result<Self, CommerceError> {
        let currency = cart.currency().ok_or(CommerceError::EmptyCart)?;

        let items = cart
            .lines()
            .iter()
            .map(|line| -> Result<OrderItem, CommerceError> {
                Ok(OrderItem {
                    product_id: line.product.id.clone(),
                    product_name: line.product.name.clone(),
                    quantity: line.quantity,
                    price: line.unit_price(),
                    total: line.unit_price().try_multiply(line.quantity)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total_amount = Money::try_sum(items.iter().map(|i| &i.total), currency)?;

        Ok(Self {
            order_number: OrderNumber::from_timestamp_millis(placed_at.timestamp_millis()),
            customer,
            items,
            total_amount,
            order_date: placed_at,
        })
    }

    /// Total number of units, saturating at `i64::MAX`.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, i| total.saturating_add(i.quantity))
    }
}

/// Proof of a paid order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// The paid order.
    pub order: OrderDraft,
    /// Reference returned by the payment gateway.
    pub payment_reference: String,
    /// When payment was approved.
    pub paid_at: DateTime<Utc>,
}

impl Receipt {
    /// Render a plain-text invoice.
    pub fn render_invoice(&self) -> String {
        let order = &self.order;
        let customer = &order.customer;
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "FreshMart");
        let _ = writeln!(out, "INVOICE {}", order.order_number);
        let _ = writeln!(out, "Date: {}", order.order_date.format("%d/%m/%Y %H:%M:%S"));
        let _ = writeln!(out);
        let _ = writeln!(out, "Customer: {}", customer.customer_name);
        let _ = writeln!(out, "Email:    {}", customer.customer_email);
        let _ = writeln!(out, "Phone:    {}", customer.customer_phone);
        let _ = writeln!(out, "Address:  {}", customer.delivery_address);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<4}{:<28}{:>5}{:>16}{:>16}",
            "#", "Product", "Qty", "Unit price", "Total"
        );
        for (i, item) in order.items.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<4}{:<28}{:>5}{:>16}{:>16}",
                i + 1,
                item.product_name,
                item.quantity,
                item.price.display(),
                item.total.display()
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{:>53}{:>16}", "Total:", order.total_amount.display());
        let _ = writeln!(out, "Payment reference: {}", self.payment_reference);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::money::Currency;
    use chrono::TimeZone;

    fn customer() -> CustomerInfo {
        CustomerInfo::new(
            "Nguyễn Văn A",
            "a@example.com",
            "0901234567",
            "12 Lý Thường Kiệt, Hà Nội",
        )
    }

    fn placed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(
            &Product::new("1", "Cà rốt", "ca-rot", Money::new(18_000, Currency::VND), 10),
            2,
            None,
        );
        cart.add(
            &Product::new("2", "Thịt bò", "thit-bo", Money::new(250_000, Currency::VND), 3),
            1,
            None,
        );
        cart
    }

    #[test]
    fn test_validate_customer() {
        assert!(customer().validate().is_ok());

        let blank = CustomerInfo::new("An", " ", "", "Huế");
        let err = blank.validate().unwrap_err().to_string();
        assert!(err.contains("email"));
        assert!(err.contains("phone"));
        assert!(!err.contains("name"));
    }

    #[test]
    fn test_draft_from_cart() {
        let draft = OrderDraft::from_cart(&cart(), customer(), placed_at()).unwrap();

        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.items[0].total, Money::new(36_000, Currency::VND));
        assert_eq!(draft.total_amount, Money::new(286_000, Currency::VND));
        assert_eq!(draft.item_count(), 3);
        assert_eq!(
            draft.order_number.as_str(),
            format!("FM{}", placed_at().timestamp_millis())
        );
    }

    #[test]
    fn test_item_count_saturates() {
        let mut draft = OrderDraft::from_cart(&cart(), customer(), placed_at()).unwrap();
        draft.items[0].quantity = i64::MAX;

        assert_eq!(draft.item_count(), i64::MAX);
    }

    #[test]
    fn test_draft_from_empty_cart() {
        let err = OrderDraft::from_cart(&Cart::new(), customer(), placed_at()).unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
    }

    #[test]
    fn test_draft_serializes_like_order_payload() {
        let draft = OrderDraft::from_cart(&cart(), customer(), placed_at()).unwrap();
        let value = serde_json::to_value(&draft).unwrap();

        assert_eq!(value["customerName"], "Nguyễn Văn A");
        assert_eq!(value["items"][1]["productName"], "Thịt bò");
        assert_eq!(value["totalAmount"]["amount"], 286_000);
    }

    #[test]
    fn test_render_invoice() {
        let receipt = Receipt {
            order: OrderDraft::from_cart(&cart(), customer(), placed_at()).unwrap(),
            payment_reference: "SIM-1".to_string(),
            paid_at: placed_at(),
        };
        let invoice = receipt.render_invoice();

        assert!(invoice.contains("INVOICE FM"));
        assert!(invoice.contains("Date: 01/03/2025 09:30:00"));
        assert!(invoice.contains("Thịt bò"));
        assert!(invoice.contains("286.000 \u{20ab}"));
        assert!(invoice.contains("Payment reference: SIM-1"));
    }
}
