//! Cart behaviour observed through the public API, across reloads and
//! storage backends.

use std::cell::RefCell;
use std::rc::Rc;

use freshmart_cache::{MemoryStore, SessionId, SessionStorage};
use freshmart_commerce::prelude::*;

fn vnd(amount: i64) -> Money {
    Money::new(amount, Currency::VND)
}

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_json_str(
        r#"[
            {"id": 1, "name": "Cà chua", "slug": "ca-chua", "price": {"amount": 25000}, "stock": 5},
            {"id": 2, "name": "Bánh mì", "slug": "banh-mi", "price": {"amount": 15000}, "stock": 3},
            {"id": 3, "name": "Cá hồi", "slug": "ca-hoi", "price": {"amount": 320000}, "stock": 2}
        ]"#,
    )
    .unwrap()
}

fn product(slug: &str) -> Product {
    catalog().product_by_slug(slug).unwrap()
}

fn expected_total(store: &CartStore<MemoryCartRepository>) -> i64 {
    store
        .cart()
        .lines()
        .iter()
        .map(|line| line.product.price.amount * line.quantity)
        .sum()
}

fn new_store() -> (CartStore<MemoryCartRepository>, MemoryCartRepository) {
    let repo = MemoryCartRepository::new();
    (CartStore::restore(repo.clone(), CartConfig::default()), repo)
}

#[test]
fn test_repeated_adds_merge_into_one_line() {
    let (mut store, _repo) = new_store();
    let tomato = product("ca-chua");

    store.add_to_cart(&tomato, 2).unwrap();
    store.add_to_cart(&tomato, 3).unwrap();

    assert_eq!(store.unique_items(), 1);
    assert_eq!(store.line(&tomato.id).unwrap().quantity, 5);
}

#[test]
fn test_add_clamps_to_stock() {
    let (mut store, _repo) = new_store();
    let salmon = product("ca-hoi");

    store.add_to_cart(&salmon, 7).unwrap();
    assert_eq!(store.line(&salmon.id).unwrap().quantity, 2);

    store.add_one(&salmon).unwrap();
    assert_eq!(store.line(&salmon.id).unwrap().quantity, 2);
}

#[test]
fn test_update_to_zero_removes_line() {
    let (mut store, _repo) = new_store();
    let tomato = product("ca-chua");
    let bread = product("banh-mi");
    store.add_to_cart(&tomato, 2).unwrap();
    store.add_to_cart(&bread, 1).unwrap();

    store.update_quantity(&tomato.id, 0).unwrap();

    assert!(store.line(&tomato.id).is_none());
    assert_eq!(store.total_items(), 1);
    assert_eq!(store.total_price(), vnd(15_000));
}

#[test]
fn test_removing_unknown_product_changes_nothing() {
    let (mut store, repo) = new_store();
    store.add_to_cart(&product("banh-mi"), 2).unwrap();
    let before = store.cart().clone();
    let writes = repo.write_count();

    store.remove_from_cart(&ProductId::new("999")).unwrap();

    assert_eq!(store.cart(), &before);
    assert_eq!(store.total_items(), 2);
    assert_eq!(store.total_price(), vnd(30_000));
    assert_eq!(repo.write_count(), writes);
}

#[test]
fn test_total_price_tracks_every_mutation() {
    let (mut store, _repo) = new_store();
    let tomato = product("ca-chua");
    let bread = product("banh-mi");
    let salmon = product("ca-hoi");

    let steps: Vec<Box<dyn Fn(&mut CartStore<MemoryCartRepository>) + '_>> = vec![
        Box::new(|s| s.add_to_cart(&tomato, 2).unwrap()),
        Box::new(|s| s.add_to_cart(&bread, 10).unwrap()),
        Box::new(|s| s.add_one(&salmon).unwrap()),
        Box::new(|s| s.update_quantity(&tomato.id, 4).unwrap()),
        Box::new(|s| s.update_quantity(&bread.id, -1).unwrap()),
        Box::new(|s| s.remove_from_cart(&salmon.id).unwrap()),
        Box::new(|s| s.add_to_cart(&salmon, 2).unwrap()),
    ];

    for step in steps {
        step(&mut store);
        assert_eq!(store.total_price().amount, expected_total(&store));
        assert_eq!(store.summary().total_price, store.total_price());
    }
    assert_eq!(store.total_price(), vnd(4 * 25_000 + 2 * 320_000));
}

#[test]
fn test_clear_resets_aggregates() {
    let (mut store, _repo) = new_store();
    store.add_to_cart(&product("ca-chua"), 3).unwrap();
    store.add_to_cart(&product("ca-hoi"), 1).unwrap();

    store.clear_cart().unwrap();

    assert_eq!(store.total_items(), 0);
    assert!(store.total_price().is_zero());
    assert!(store.summary().is_empty());
}

#[test]
fn test_reload_reproduces_lines() {
    let (mut store, repo) = new_store();
    store.add_to_cart(&product("ca-hoi"), 1).unwrap();
    store.add_to_cart(&product("ca-chua"), 4).unwrap();
    store.add_to_cart(&product("banh-mi"), 2).unwrap();
    store.update_quantity(&ProductId::new("1"), 3).unwrap();

    let reloaded = CartStore::restore(repo, CartConfig::default());

    assert_eq!(reloaded.cart(), store.cart());
    let order: Vec<_> = reloaded
        .cart()
        .lines()
        .iter()
        .map(|l| (l.product.slug.as_str(), l.quantity))
        .collect();
    assert_eq!(order, vec![("ca-hoi", 1), ("ca-chua", 3), ("banh-mi", 2)]);
}

#[test]
fn test_session_storage_is_shared_within_a_session_only() {
    let sessions = MemoryStore::new();
    let tab = SessionId::new("tab-a");
    let mut store = CartStore::restore(
        SessionCartRepository::new(sessions.session(tab.clone())),
        CartConfig::default(),
    );
    store.add_to_cart(&product("banh-mi"), 2).unwrap();

    let same_tab = CartStore::restore(
        SessionCartRepository::new(sessions.session(tab)),
        CartConfig::default(),
    );
    let other_tab = CartStore::restore(
        SessionCartRepository::new(sessions.session(SessionId::new("tab-b"))),
        CartConfig::default(),
    );

    assert_eq!(same_tab.total_items(), 2);
    assert!(other_tab.is_empty());
}

#[test]
fn test_directory_storage_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let session = SessionId::new("sess_disk");

    {
        let storage = SessionStorage::open_dir(dir.path(), session.clone()).unwrap();
        let mut store = CartStore::restore(SessionCartRepository::new(storage), CartConfig::default());
        store.add_to_cart(&product("ca-chua"), 2).unwrap();
        store.add_to_cart(&product("ca-hoi"), 1).unwrap();
    }

    let storage = SessionStorage::open_dir(dir.path(), session).unwrap();
    let store = CartStore::restore(SessionCartRepository::new(storage), CartConfig::default());
    assert_eq!(store.total_items(), 3);
    assert_eq!(store.total_price(), vnd(370_000));
}

#[test]
fn test_custom_storage_key() {
    let sessions = MemoryStore::new();
    let config = CartConfig {
        storage_key: "cart_v2".to_string(),
        ..CartConfig::default()
    };
    let storage = sessions.session(SessionId::new("tab"));
    let repo = SessionCartRepository::with_key(storage.clone(), config.storage_key.clone());
    let mut store = CartStore::restore(repo, config);

    store.add_one(&product("banh-mi")).unwrap();

    assert!(storage.contains("cart_v2").unwrap());
    assert!(!storage.contains("freshmart_cart").unwrap());
}

#[test]
fn test_quota_failure_keeps_memory_authoritative() {
    let storage = SessionStorage::in_memory(SessionId::new("tab")).with_quota(200);
    let mut store = CartStore::restore(SessionCartRepository::new(storage), CartConfig::default());
    let persisted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&persisted);
    store.subscribe(move |event, _| sink.borrow_mut().push(event.persisted));

    store.add_one(&product("banh-mi")).unwrap();
    let err = store.add_to_cart(&product("ca-chua"), 1).unwrap_err();

    assert!(matches!(err, CommerceError::Persistence(_)));
    assert_eq!(store.unique_items(), 2);
    assert_eq!(*persisted.borrow(), vec![true, false]);
}

#[test]
fn test_subscribers_stop_after_unsubscribe() {
    let (mut store, _repo) = new_store();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let id = store.subscribe(move |event, _| sink.borrow_mut().push(event.kind.clone()));

    let tomato = product("ca-chua");
    store.add_to_cart(&tomato, 1).unwrap();
    store.update_quantity(&tomato.id, 2).unwrap();
    store.unsubscribe(id);
    store.clear_cart().unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            CartEventKind::Added { product_id: tomato.id.clone(), quantity: 1 },
            CartEventKind::Updated { product_id: tomato.id.clone(), quantity: 2 },
        ]
    );
}

#[test]
fn test_restore_repairs_tampered_storage() {
    let repo = MemoryCartRepository::new();
    repo.set_raw(
        r#"[
            {"product": {"id": "2", "name": "Bánh mì", "slug": "banh-mi", "price": {"amount": 15000}, "stock": 3}, "quantity": 9},
            {"product": {"id": "2", "name": "Bánh mì", "slug": "banh-mi", "price": {"amount": 15000}, "stock": 3}, "quantity": 1},
            {"product": {"id": "3", "name": "Cá hồi", "slug": "ca-hoi", "price": {"amount": 320000}, "stock": 2}, "quantity": 0}
        ]"#,
    );

    let store = CartStore::restore(repo, CartConfig::default());

    assert_eq!(store.unique_items(), 1);
    assert_eq!(store.total_items(), 3);
}
