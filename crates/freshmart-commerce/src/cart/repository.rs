//! Where a cart lives between page loads.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use freshmart_cache::SessionStorage;

use crate::cart::Cart;
use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::CommerceError;

/// Persistence seam for [`CartStore`](crate::cart::CartStore).
///
/// `save` receives the full cart after every change; `load` returns an empty
/// cart when nothing has been saved yet.
pub trait CartRepository {
    /// Read the saved cart.
    fn load(&self) -> Result<Cart, CommerceError>;

    /// Replace the saved cart.
    fn save(&self, cart: &Cart) -> Result<(), CommerceError>;
}

impl<R: CartRepository + ?Sized> CartRepository for Box<R> {
    fn load(&self) -> Result<Cart, CommerceError> {
        (**self).load()
    }

    fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        (**self).save(cart)
    }
}

/// Cart saved under a fixed key of a session storage area.
#[derive(Debug, Clone)]
pub struct SessionCartRepository {
    storage: SessionStorage,
    key: String,
}

impl SessionCartRepository {
    /// Use `storage` with the default key.
    pub fn new(storage: SessionStorage) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Use `storage` with a custom key.
    pub fn with_key(storage: SessionStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The underlying storage area.
    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }

    /// Key the cart is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CartRepository for SessionCartRepository {
    fn load(&self) -> Result<Cart, CommerceError> {
        Ok(self.storage.get::<Cart>(&self.key)?.unwrap_or_default())
    }

    fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        self.storage.set(&self.key, cart)?;
        Ok(())
    }
}

/// In-process repository holding the serialized cart.
///
/// Clones share the same slot, so a clone handed to a new store behaves like
/// the same browser tab after a reload. Writes can be made to fail to
/// exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartRepository {
    slot: Rc<RefCell<Option<String>>>,
    fail_writes: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryCartRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `save` calls fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// The saved JSON, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Overwrite the saved JSON directly.
    pub fn set_raw(&self, json: impl Into<String>) {
        *self.slot.borrow_mut() = Some(json.into());
    }
}

impl CartRepository for MemoryCartRepository {
    fn load(&self) -> Result<Cart, CommerceError> {
        match self.slot.borrow().as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Cart::new()),
        }
    }

    fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        if self.fail_writes.get() {
            return Err(CommerceError::Persistence(
                "memory repository rejected the write".to_string(),
            ));
        }
        let json = serde_json::to_string(cart)?;
        *self.slot.borrow_mut() = Some(json);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
