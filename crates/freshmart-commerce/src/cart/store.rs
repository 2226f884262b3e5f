//! The cart state manager shared by every view of a session.

use crate::cart::{Cart, CartLine, CartRepository, CartSummary, LineChange};
use crate::catalog::Product;
use crate::config::CartConfig;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;

/// What a mutation did to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEventKind {
    /// A line was created or grew; `quantity` is the line's new quantity.
    Added { product_id: ProductId, quantity: i64 },
    /// A line's quantity was set.
    Updated { product_id: ProductId, quantity: i64 },
    /// A line was removed.
    Removed { product_id: ProductId },
    /// Every line was removed.
    Cleared,
}

/// Notification delivered to subscribers after a cart change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEvent {
    /// What changed.
    pub kind: CartEventKind,
    /// Aggregates after the change.
    pub summary: CartSummary,
    /// Whether the change reached storage.
    pub persisted: bool,
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartEvent, &Cart)>;

/// Single source of truth for the active cart.
///
/// Every mutation that changes the cart is written through the repository
/// and then announced to subscribers. Mutations never reject input: bad
/// quantities are clamped and unknown products are ignored. The only error a
/// mutation returns is [`CommerceError::Persistence`], and by then the change
/// is already applied in memory.
///
/// # Example
///
/// ```rust
/// use freshmart_commerce::prelude::*;
///
/// let repo = MemoryCartRepository::new();
/// let mut store = CartStore::restore(repo.clone(), CartConfig::default());
///
/// let eggs = Product::new("9", "Trứng gà", "trung-ga", Money::new(30_000, Currency::VND), 6);
/// store.add_to_cart(&eggs, 2).unwrap();
/// store.add_to_cart(&eggs, 10).unwrap();
///
/// assert_eq!(store.total_items(), 6);
/// assert_eq!(store.total_price(), Money::new(180_000, Currency::VND));
///
/// // A reload sees the same cart
/// let reloaded = CartStore::restore(repo, CartConfig::default());
/// assert_eq!(reloaded.cart(), store.cart());
/// ```
pub struct CartStore<R: CartRepository> {
    cart: Cart,
    repository: R,
    config: CartConfig,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<R: CartRepository> CartStore<R> {
    /// Start a session, restoring whatever the repository holds.
    ///
    /// Stored data that cannot be read is discarded with a warning and the
    /// session starts with an empty cart.
    pub fn restore(repository: R, config: CartConfig) -> Self {
        let cart = match repository.load() {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable stored cart");
                Cart::new()
            }
        };
        Self::from_parts(cart, repository, config)
    }

    /// Like [`CartStore::restore`], but fails if stored data is unreadable.
    pub fn try_restore(repository: R, config: CartConfig) -> Result<Self, CommerceError> {
        let cart = repository.load()?;
        Ok(Self::from_parts(cart, repository, config))
    }

    fn from_parts(mut cart: Cart, repository: R, config: CartConfig) -> Self {
        let adjusted = cart.normalize(config.max_line_quantity);
        if adjusted > 0 {
            tracing::warn!(adjusted, "stored cart violated line invariants; repaired");
        }
        tracing::debug!(lines = cart.unique_items(), "cart restored");
        Self {
            cart,
            repository,
            config,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Register a listener called after every cart change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartEvent, &Cart) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() < len_before
    }

    /// Add `quantity` units of `product`, clamped to its stock.
    pub fn add_to_cart(&mut self, product: &Product, quantity: i64) -> Result<(), CommerceError> {
        match self.cart.add(product, quantity, self.config.max_line_quantity) {
            Some(0) => self.commit(CartEventKind::Removed {
                product_id: product.id.clone(),
            }),
            Some(quantity) => self.commit(CartEventKind::Added {
                product_id: product.id.clone(),
                quantity,
            }),
            None => Ok(()),
        }
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &Product) -> Result<(), CommerceError> {
        self.add_to_cart(product, 1)
    }

    /// Remove the line for `product_id`; unknown ids are a no-op.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Result<(), CommerceError> {
        if !self.cart.remove(product_id) {
            return Ok(());
        }
        self.commit(CartEventKind::Removed {
            product_id: product_id.clone(),
        })
    }

    /// Set a line's quantity. `<= 0` removes the line, values above stock
    /// are clamped.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        new_quantity: i64,
    ) -> Result<(), CommerceError> {
        match self
            .cart
            .set_quantity(product_id, new_quantity, self.config.max_line_quantity)
        {
            LineChange::Unchanged => Ok(()),
            LineChange::Quantity(quantity) => self.commit(CartEventKind::Updated {
                product_id: product_id.clone(),
                quantity,
            }),
            LineChange::Removed => self.commit(CartEventKind::Removed {
                product_id: product_id.clone(),
            }),
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) -> Result<(), CommerceError> {
        if !self.cart.clear() {
            return Ok(());
        }
        self.commit(CartEventKind::Cleared)
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> i64 {
        self.cart.total_items()
    }

    /// Sum of `unit_price × quantity` using each line's price snapshot.
    pub fn total_price(&self) -> Money {
        self.cart.total_price(self.config.currency)
    }

    /// Both aggregates plus the number of distinct products.
    pub fn summary(&self) -> CartSummary {
        CartSummary::of(&self.cart, self.config.currency)
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The line for `product_id`, if any.
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.cart.line(product_id)
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Number of distinct products.
    pub fn unique_items(&self) -> usize {
        self.cart.unique_items()
    }

    /// Store settings.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// The persistence backend.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Write the cart through and notify listeners.
    fn commit(&mut self, kind: CartEventKind) -> Result<(), CommerceError> {
        tracing::debug!(change = ?kind, total_items = self.cart.total_items(), "cart changed");

        let saved = self.repository.save(&self.cart);
        if let Err(e) = &saved {
            tracing::warn!(error = %e, "cart change not persisted; in-memory cart stays authoritative");
        }

        let event = CartEvent {
            kind,
            summary: self.summary(),
            persisted: saved.is_ok(),
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event, &self.cart);
        }

        saved
    }
}

impl<R: CartRepository> std::fmt::Debug for CartStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::MemoryCartRepository;
    use crate::money::Currency;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn product(id: &str, price: i64, stock: i64) -> Product {
        Product::new(
            id,
            format!("Product {}", id),
            format!("product-{}", id),
            Money::new(price, Currency::VND),
            stock,
        )
    }

    fn store() -> (CartStore<MemoryCartRepository>, MemoryCartRepository) {
        let repo = MemoryCartRepository::new();
        (CartStore::restore(repo.clone(), CartConfig::default()), repo)
    }

    fn record_events(store: &mut CartStore<MemoryCartRepository>) -> Rc<RefCell<Vec<CartEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_every_change_is_saved() {
        let (mut store, repo) = store();
        let p = product("1", 10_000, 10);

        store.add_to_cart(&p, 2).unwrap();
        store.update_quantity(&p.id, 4).unwrap();
        store.remove_from_cart(&p.id).unwrap();

        assert_eq!(repo.write_count(), 3);
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_no_op_mutations_do_not_save_or_notify() {
        let (mut store, repo) = store();
        let events = record_events(&mut store);

        store.remove_from_cart(&"missing".into()).unwrap();
        store.update_quantity(&"missing".into(), 3).unwrap();
        store.clear_cart().unwrap();
        store.add_to_cart(&product("1", 10_000, 0), 1).unwrap();

        assert_eq!(repo.write_count(), 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_subscribers_see_each_change() {
        let (mut store, _repo) = store();
        let events = record_events(&mut store);
        let p = product("1", 10_000, 10);

        store.add_one(&p).unwrap();
        store.add_to_cart(&p, 2).unwrap();
        store.update_quantity(&p.id, 0).unwrap();

        let events = events.borrow();
        let kinds: Vec<_> = events.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                CartEventKind::Added { product_id: p.id.clone(), quantity: 1 },
                CartEventKind::Added { product_id: p.id.clone(), quantity: 3 },
                CartEventKind::Removed { product_id: p.id.clone() },
            ]
        );
        assert_eq!(events[1].summary.total_items, 3);
        assert_eq!(events[1].summary.total_price.amount, 30_000);
        assert!(events.iter().all(|e| e.persisted));
    }

    #[test]
    fn test_listener_receives_current_cart() {
        let (mut store, _repo) = store();
        let badge = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&badge);
        store.subscribe(move |_, cart| *sink.borrow_mut() = cart.total_items());

        store.add_to_cart(&product("1", 10_000, 10), 4).unwrap();
        assert_eq!(*badge.borrow(), 4);
    }

    #[test]
    fn test_unsubscribe() {
        let (mut store, _repo) = store();
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);

        store.add_one(&product("1", 10_000, 10)).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add_one(&product("2", 10_000, 10)).unwrap();

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_persistence_failure_is_reported() {
        let (mut store, repo) = store();
        let events = record_events(&mut store);
        let p = product("1", 10_000, 10);
        store.add_to_cart(&p, 1).unwrap();

        repo.set_fail_writes(true);
        let err = store.add_to_cart(&p, 1).unwrap_err();
        assert!(matches!(err, CommerceError::Persistence(_)));

        // Memory stays authoritative, storage keeps the last good write
        assert_eq!(store.total_items(), 2);
        assert_eq!(repo.load().unwrap().total_items(), 1);
        assert!(!events.borrow()[1].persisted);
    }

    #[test]
    fn test_re_add_saves_lower_stock_bound() {
        let (mut store, repo) = store();
        let events = record_events(&mut store);
        store.add_to_cart(&product("1", 10_000, 10), 2).unwrap();

        let restocked = product("1", 10_000, 2);
        store.add_to_cart(&restocked, 1).unwrap();

        assert_eq!(repo.write_count(), 2);
        assert_eq!(events.borrow().len(), 2);
        assert_eq!(store.line(&restocked.id).unwrap().quantity, 2);

        let reloaded = CartStore::restore(repo.clone(), CartConfig::default());
        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(reloaded.line(&restocked.id).unwrap().product.stock, 2);
    }

    #[test]
    fn test_total_items_saturates_across_lines() {
        let (mut store, _repo) = store();
        store.add_to_cart(&product("1", 1, i64::MAX), i64::MAX).unwrap();
        store.add_to_cart(&product("2", 1, i64::MAX), 1).unwrap();

        assert_eq!(store.unique_items(), 2);
        assert_eq!(store.total_items(), i64::MAX);
        assert_eq!(store.summary().total_items, i64::MAX);
    }

    #[test]
    fn test_restore_discards_unreadable_data() {
        let repo = MemoryCartRepository::new();
        repo.set_raw("[{]");

        let store = CartStore::restore(repo.clone(), CartConfig::default());
        assert!(store.is_empty());
        assert!(CartStore::try_restore(repo, CartConfig::default()).is_err());
    }

    #[test]
    fn test_line_cap_from_config() {
        let config = CartConfig {
            max_line_quantity: Some(3),
            ..CartConfig::default()
        };
        let mut store = CartStore::restore(MemoryCartRepository::new(), config);
        let p = product("1", 10_000, 50);

        store.add_to_cart(&p, 10).unwrap();
        assert_eq!(store.line(&p.id).unwrap().quantity, 3);
    }

    #[test]
    fn test_empty_total_uses_configured_currency() {
        let config = CartConfig {
            currency: Currency::USD,
            ..CartConfig::default()
        };
        let store = CartStore::restore(MemoryCartRepository::new(), config);
        assert_eq!(store.total_price(), Money::zero(Currency::USD));
    }
}
