//! Mock grocery ordering for the ingredients a recipe is missing.
//!
//! The store list is static and placing an order only produces a
//! confirmation; nothing is sent anywhere.

use tracing::info;

/// A nearby store offering delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketStore {
    pub name: &'static str,
    pub distance: &'static str,
    pub delivery_time: &'static str,
    pub price_tier: &'static str,
}

pub const MOCK_STORES: &[MarketStore] = &[
    MarketStore {
        name: "Hızlı Market",
        distance: "0.5 km",
        delivery_time: "10-15 dk",
        price_tier: "₺₺",
    },
    MarketStore {
        name: "Taze Yöresel",
        distance: "1.2 km",
        delivery_time: "20-30 dk",
        price_tier: "₺₺₺",
    },
];

/// Confirmation of a mock order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockOrder {
    pub store: MarketStore,
    pub items: Vec<String>,
}

/// Place a mock order for `items` at the store with the given index.
///
/// Returns `None` for an unknown store or when nothing is missing.
pub fn place_mock_order(store_index: usize, items: &[String]) -> Option<MockOrder> {
    let store = *MOCK_STORES.get(store_index)?;
    if items.is_empty() {
        return None;
    }

    info!(
        store = %store.name,
        item_count = items.len(),
        "Mock grocery order placed"
    );

    Some(MockOrder {
        store,
        items: items.to_vec(),
    })
}
