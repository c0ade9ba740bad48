//! The cart mutator: the only mutation path for cart state.
//!
//! `CartService` owns the in-memory cart and wires every mutation through
//! the same sequence: mutate, persist, schedule the badge, then emit exactly
//! one analytics event built from the post-mutation state (for checkout,
//! from the pre-clear state). Collaborators - stores, data layer, renderer,
//! notifier, location - are injected, so the service runs unchanged under
//! tests, the demo shell, or a future real frontend.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tokio::sync::Mutex;

use aurora_core::{Adjustment, Cart, LineItem, OrderId, Page, Price, Product};

use crate::analytics::{AnalyticsEvent, AnalyticsSink, CartSnapshot, OrderSnapshot, ProductEntry};
use crate::badge::{BadgeUpdater, CountBadge};
use crate::config::StorefrontConfig;
use crate::pages::{PageContextSource, PageInfo};
use crate::render::{CartRenderer, CartView, Notifier};
use crate::store::{KeyValueStore, keys};

/// Prefix for generated order identifiers.
const ORDER_ID_PREFIX: &str = "ORD";

/// Exclusive upper bound for the random order-id suffix.
const ORDER_ID_SPAN: u32 = 100_000;

/// Errors surfaced by cart mutations.
///
/// Not-found updates and removals are silent no-ops, not errors, matching
/// the observed behavior of the original client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product offered for adding has no id.
    #[error("product is missing an id")]
    MissingProductId,

    /// Checkout was attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,
}

/// Outcome of a successful checkout, signalling navigation to the
/// confirmation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub order_id: OrderId,
    pub revenue: Price,
    /// Where the caller should navigate next.
    pub redirect: Page,
}

/// The cart engine.
pub struct CartService {
    cart: Arc<Mutex<Cart>>,
    store: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    location: Arc<dyn PageContextSource>,
    badge: BadgeUpdater,
    badge_debounce: std::time::Duration,
    data_layer: Option<Arc<dyn AnalyticsSink>>,
    renderer: Option<Arc<dyn CartRenderer>>,
    notifier: Option<Arc<dyn Notifier>>,
    currency_symbol: String,
}

impl CartService {
    /// Create a service over the given persistent store, ephemeral session
    /// store, and navigation source. Optional collaborators are attached
    /// with the `with_*` builders.
    #[must_use]
    pub fn new(
        config: &StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        location: Arc<dyn PageContextSource>,
    ) -> Self {
        let cart = Arc::new(Mutex::new(Cart::new()));
        let badge = BadgeUpdater::new(Arc::clone(&cart), Vec::new(), config.badge_debounce);

        Self {
            cart,
            store,
            session,
            location,
            badge,
            badge_debounce: config.badge_debounce,
            data_layer: None,
            renderer: None,
            notifier: None,
            currency_symbol: config.currency_symbol.clone(),
        }
    }

    /// Attach count badges to update (debounced) after every mutation.
    #[must_use]
    pub fn with_badges(mut self, badges: Vec<Arc<dyn CountBadge>>) -> Self {
        self.badge = BadgeUpdater::new(Arc::clone(&self.cart), badges, self.badge_debounce);
        self
    }

    /// Attach the analytics data layer. Without one, events are dropped
    /// silently.
    #[must_use]
    pub fn with_data_layer(mut self, data_layer: Arc<dyn AnalyticsSink>) -> Self {
        self.data_layer = Some(data_layer);
        self
    }

    /// Attach the cart renderer invoked after cart-page changes.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn CartRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Attach the user-notification collaborator.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The debounced badge updater.
    #[must_use]
    pub const fn badge(&self) -> &BadgeUpdater {
        &self.badge
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Hydrate the cart from the persistent store.
    ///
    /// Missing or unparseable data fails soft: the cart resets to empty and
    /// the store is rewritten to an empty list. Never errors to the caller.
    pub async fn hydrate(&self) {
        let loaded = match self.store.get(keys::CART) {
            Ok(Some(raw)) => match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) => Some(cart),
                Err(e) => {
                    tracing::warn!("Stored cart is unparseable, resetting to empty: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read stored cart, resetting to empty: {e}");
                None
            }
        };

        let cart = loaded.unwrap_or_else(|| {
            if let Err(e) = self.store.set(keys::CART, "[]") {
                tracing::warn!("Failed to reset stored cart: {e}");
            }
            Cart::new()
        });

        *self.cart.lock().await = cart;
        self.badge.schedule();
    }

    /// Serialize and write the cart, then schedule a badge update.
    ///
    /// Write failures are logged and the in-memory state kept; persistence
    /// never raises.
    fn persist(&self, cart: &Cart) {
        match serde_json::to_string(cart) {
            Ok(raw) => {
                if let Err(e) = self.store.set(keys::CART, &raw) {
                    tracing::warn!("Failed to persist cart, keeping in-memory state: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize cart: {e}"),
        }
        self.badge.schedule();
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product to the cart.
    ///
    /// Increments the quantity of an existing line item or appends a
    /// quantity-1 snapshot, persists, notifies the user, and emits `scAdd`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingProductId`] (with no state change and no
    /// event) if the product id is empty.
    pub async fn add_item(&self, product: &Product) -> Result<(), CartError> {
        if product.id.is_empty() {
            tracing::warn!(name = %product.name, "Rejected add to cart: product has no id");
            return Err(CartError::MissingProductId);
        }

        let mut cart = self.cart.lock().await;
        let qty = cart.add(product);
        let snapshot = CartSnapshot::from(&*cart);
        self.persist(&cart);
        drop(cart);

        if let Some(notifier) = &self.notifier {
            notifier.notify(&format!("{} added to cart!", product.name));
        }

        let page = self.location.current();
        self.emit(AnalyticsEvent::sc_add(
            &page,
            ProductEntry::from_product(product, qty),
            snapshot,
        ));
        Ok(())
    }

    /// Apply a signed quantity delta to a line item.
    ///
    /// Unknown ids are a silent no-op. A resulting quantity of zero or below
    /// takes the removal path (including its `scRemove` event); otherwise
    /// the change persists, re-renders, and emits `scUpdate`.
    pub async fn update_quantity(&self, id: &str, delta: i64) {
        let mut cart = self.cart.lock().await;
        let event = match cart.adjust(id, delta) {
            Adjustment::NotFound => {
                drop(cart);
                tracing::debug!(id, "Quantity update for unknown line item ignored");
                return;
            }
            Adjustment::Removed(item) => {
                let snapshot = CartSnapshot::from(&*cart);
                self.persist(&cart);
                drop(cart);
                self.removal_event(&item, snapshot)
            }
            Adjustment::Updated(_) => {
                let Some(item) = cart.get(id).cloned() else {
                    return;
                };
                let snapshot = CartSnapshot::from(&*cart);
                self.persist(&cart);
                drop(cart);

                let page = PageInfo::cart_page(&self.location.current().url);
                AnalyticsEvent::sc_update(&page, ProductEntry::brief(&item), snapshot)
            }
        };

        self.rerender().await;
        self.emit(event);
    }

    /// Remove a line item from the cart.
    ///
    /// Unknown ids are a silent no-op and emit nothing. Otherwise the item
    /// is deleted (remaining order preserved), the cart persists and
    /// re-renders, and `scRemove` carries the removed item's pre-removal
    /// fields with the post-removal snapshot.
    pub async fn remove_item(&self, id: &str) {
        let mut cart = self.cart.lock().await;
        let Some(item) = cart.remove(id) else {
            drop(cart);
            tracing::debug!(id, "Removal of unknown line item ignored");
            return;
        };

        let snapshot = CartSnapshot::from(&*cart);
        self.persist(&cart);
        drop(cart);

        self.rerender().await;
        self.emit(self.removal_event(&item, snapshot));
    }

    /// Check out the cart.
    ///
    /// Emits one `purchase` event built from the pre-clear contents, then
    /// clears the cart, persists the empty cart, and records the order id in
    /// the ephemeral session store for the confirmation page.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] (user-visibly, with no state change
    /// and no event) if the cart is empty.
    pub async fn checkout(&self) -> Result<Receipt, CartError> {
        let mut cart = self.cart.lock().await;
        if cart.is_empty() {
            drop(cart);
            if let Some(notifier) = &self.notifier {
                notifier.notify("Your cart is empty!");
            }
            return Err(CartError::EmptyCart);
        }

        let order_id = generate_order_id();
        let revenue = cart.total();
        let page = PageInfo::checkout_page(&self.location.current().url);
        let order = OrderSnapshot {
            id: order_id.clone(),
            revenue,
            products: cart.items().iter().map(ProductEntry::from_line).collect(),
        };

        // The purchase event carries the pre-clear contents; clearing
        // happens only after the emission.
        self.emit(AnalyticsEvent::purchase(
            &page,
            order,
            CartSnapshot::from(&*cart),
        ));

        cart.clear();
        self.persist(&cart);
        drop(cart);

        if let Err(e) = self.session.set(keys::ORDER_ID, order_id.as_str()) {
            tracing::warn!("Failed to record order id in session store: {e}");
        }

        Ok(Receipt {
            order_id,
            revenue,
            redirect: Page::ThankYou,
        })
    }

    /// Project the cart for the cart page, render it, and emit `scView`
    /// (also for an empty cart).
    pub async fn view_cart(&self) -> CartView {
        let cart = self.cart.lock().await;
        let view = CartView::project(&cart, &self.currency_symbol);
        let snapshot = CartSnapshot::from(&*cart);
        drop(cart);

        if let Some(renderer) = &self.renderer {
            renderer.render(&view);
        }

        let page = PageInfo::cart_page(&self.location.current().url);
        self.emit(AnalyticsEvent::sc_view(&page, snapshot));
        view
    }

    // =========================================================================
    // Derivations
    // =========================================================================

    /// Σ price × qty over all line items.
    pub async fn cart_total(&self) -> Price {
        self.cart.lock().await.total()
    }

    /// Σ qty over all line items.
    pub async fn cart_item_count(&self) -> u64 {
        self.cart.lock().await.item_count()
    }

    /// A snapshot of the current line items.
    pub async fn items(&self) -> Vec<LineItem> {
        self.cart.lock().await.items().to_vec()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn removal_event(&self, item: &LineItem, snapshot: CartSnapshot) -> AnalyticsEvent {
        let page = PageInfo::cart_page(&self.location.current().url);
        AnalyticsEvent::sc_remove(&page, ProductEntry::from_line(item), snapshot)
    }

    async fn rerender(&self) {
        if let Some(renderer) = &self.renderer {
            let cart = self.cart.lock().await;
            let view = CartView::project(&cart, &self.currency_symbol);
            drop(cart);
            renderer.render(&view);
        }
    }

    fn emit(&self, event: AnalyticsEvent) {
        if let Some(sink) = &self.data_layer {
            sink.push(event);
        } else {
            tracing::trace!(event = %event.event, "No data layer configured, dropping event");
        }
    }
}

/// Generate an order identifier: fixed prefix plus a random integer in
/// `[0, 100000)`.
fn generate_order_id() -> OrderId {
    let suffix = rand::rng().random_range(0..ORDER_ID_SPAN);
    OrderId::new(format!("{ORDER_ID_PREFIX}{suffix}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use url::Url;

    use crate::analytics::{EventKind, MemoryDataLayer};
    use crate::pages::Location;
    use crate::store::MemoryStore;

    struct RecordingNotifier {
        messages: StdMutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                messages: StdMutex::new(Vec::new()),
            }
        }

        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    struct Harness {
        service: CartService,
        store: Arc<MemoryStore>,
        session: Arc<MemoryStore>,
        data_layer: Arc<MemoryDataLayer>,
        location: Arc<Location>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(MemoryStore::new());
        let data_layer = Arc::new(MemoryDataLayer::new());
        let location = Arc::new(Location::new(
            Url::parse("https://aurora.example/index.html").unwrap(),
        ));
        let notifier = Arc::new(RecordingNotifier::new());

        let service = CartService::new(
            &StorefrontConfig::default(),
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
            Arc::clone(&session) as Arc<dyn KeyValueStore>,
            Arc::clone(&location) as Arc<dyn PageContextSource>,
        )
        .with_data_layer(Arc::clone(&data_layer) as Arc<dyn AnalyticsSink>)
        .with_notifier(Arc::clone(&notifier) as Arc<dyn Notifier>);

        Harness {
            service,
            store,
            session,
            data_layer,
            location,
            notifier,
        }
    }

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            category: "Test".to_string(),
            brand: "Aurora".to_string(),
            price: Price::new(price),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_hydrate_missing_data_resets_store() {
        let h = harness();
        h.service.hydrate().await;

        assert_eq!(h.service.cart_item_count().await, 0);
        assert_eq!(h.store.get(keys::CART).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_hydrate_corrupt_data_resets_store() {
        let h = harness();
        h.store.set(keys::CART, "{not json").unwrap();

        h.service.hydrate().await;

        assert_eq!(h.service.cart_item_count().await, 0);
        assert_eq!(h.store.get(keys::CART).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_persist_hydrate_round_trip() {
        let h = harness();
        h.service.add_item(&product("1", 2499)).await.unwrap();
        h.service.add_item(&product("2", 1299)).await.unwrap();
        h.service.add_item(&product("1", 2499)).await.unwrap();
        let before = h.service.items().await;

        // A second service over the same store sees the identical cart
        let second = CartService::new(
            &StorefrontConfig::default(),
            Arc::clone(&h.store) as Arc<dyn KeyValueStore>,
            Arc::new(MemoryStore::new()),
            Arc::clone(&h.location) as Arc<dyn PageContextSource>,
        );
        second.hydrate().await;

        assert_eq!(second.items().await, before);
    }

    #[tokio::test]
    async fn test_add_item_without_id_is_rejected() {
        let h = harness();
        h.service.hydrate().await;

        let invalid = Product {
            id: String::new(),
            ..product("x", 100)
        };
        assert_eq!(
            h.service.add_item(&invalid).await,
            Err(CartError::MissingProductId)
        );
        assert_eq!(h.service.cart_item_count().await, 0);
        assert!(h.data_layer.is_empty());
        assert!(h.notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_add_item_emits_sc_add_after_persist() {
        let h = harness();
        h.location
            .navigate(Url::parse("https://aurora.example/pdp.html?id=1").unwrap());

        h.service.add_item(&product("1", 2499)).await.unwrap();
        h.service.add_item(&product("1", 2499)).await.unwrap();

        // Persisted before emission: the store already holds both units
        let stored = h.store.get(keys::CART).unwrap().unwrap();
        assert!(stored.contains("\"qty\":2"));

        let events = h.data_layer.events();
        assert_eq!(events.len(), 2);
        let last = &events[1];
        assert_eq!(last.event, EventKind::ScAdd);
        assert_eq!(last.page.page_name, "PDP");
        let entry = &last.product.as_ref().unwrap()[0];
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.price, Some(Price::new(2499)));
        assert_eq!(last.cart.as_ref().unwrap().total, Price::new(4998));

        assert_eq!(h.notifier.messages(), vec![
            "Product 1 added to cart!",
            "Product 1 added to cart!"
        ]);
    }

    #[tokio::test]
    async fn test_update_quantity_emits_sc_update() {
        let h = harness();
        h.service.add_item(&product("1", 100)).await.unwrap();

        h.service.update_quantity("1", 2).await;

        let last = h.data_layer.last().unwrap();
        assert_eq!(last.event, EventKind::ScUpdate);
        assert_eq!(last.page.page_name, "Cart");
        let entry = &last.product.as_ref().unwrap()[0];
        assert_eq!(entry.quantity, 3);
        // Brief projection: no catalog fields
        assert!(entry.price.is_none());
        assert!(entry.brand.is_none());
        assert_eq!(h.service.cart_item_count().await, 3);
    }

    #[tokio::test]
    async fn test_update_quantity_to_zero_removes_and_emits_sc_remove() {
        let h = harness();
        h.service.add_item(&product("1", 100)).await.unwrap();

        h.service.update_quantity("1", -1).await;

        assert_eq!(h.service.cart_item_count().await, 0);
        let last = h.data_layer.last().unwrap();
        assert_eq!(last.event, EventKind::ScRemove);
        assert!(last.cart.as_ref().unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_unknown_id_is_silent() {
        let h = harness();
        h.service.add_item(&product("1", 100)).await.unwrap();
        let events_before = h.data_layer.len();

        h.service.update_quantity("zzz", 1).await;

        assert_eq!(h.data_layer.len(), events_before);
        assert_eq!(h.service.cart_item_count().await, 1);
    }

    #[tokio::test]
    async fn test_remove_item_emits_pre_removal_fields() {
        let h = harness();
        h.service.add_item(&product("1", 100)).await.unwrap();
        h.service.add_item(&product("1", 100)).await.unwrap();
        h.service.add_item(&product("2", 500)).await.unwrap();

        h.service.remove_item("1").await;

        let last = h.data_layer.last().unwrap();
        assert_eq!(last.event, EventKind::ScRemove);
        let entry = &last.product.as_ref().unwrap()[0];
        assert_eq!(entry.product_id, "1");
        assert_eq!(entry.quantity, 2, "carries the pre-removal quantity");
        // Post-removal snapshot
        let snapshot = last.cart.as_ref().unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.total, Price::new(500));
    }

    #[tokio::test]
    async fn test_remove_unknown_id_emits_nothing() {
        let h = harness();
        h.service.add_item(&product("1", 100)).await.unwrap();
        let events_before = h.data_layer.len();

        h.service.remove_item("zzz").await;

        assert_eq!(h.data_layer.len(), events_before);
        assert_eq!(h.service.cart_item_count().await, 1);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_rejected_visibly() {
        let h = harness();
        h.service.hydrate().await;

        assert_eq!(h.service.checkout().await, Err(CartError::EmptyCart));
        assert!(h.data_layer.is_empty());
        assert_eq!(h.notifier.messages(), vec!["Your cart is empty!"]);
        assert!(h.session.get(keys::ORDER_ID).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_checkout_emits_purchase_then_clears() {
        let h = harness();
        // Item A qty=2 price=100, item B qty=1 price=500
        h.service.add_item(&product("a", 100)).await.unwrap();
        h.service.add_item(&product("a", 100)).await.unwrap();
        h.service.add_item(&product("b", 500)).await.unwrap();
        let adds = h.data_layer.len();

        let receipt = h.service.checkout().await.unwrap();

        assert_eq!(receipt.revenue, Price::new(700));
        assert_eq!(receipt.redirect, Page::ThankYou);
        assert!(receipt.order_id.as_str().starts_with(ORDER_ID_PREFIX));

        // Exactly one purchase event, built from the pre-clear contents
        assert_eq!(h.data_layer.len(), adds + 1);
        let last = h.data_layer.last().unwrap();
        assert_eq!(last.event, EventKind::Purchase);
        let order = last.order.as_ref().unwrap();
        assert_eq!(order.revenue, Price::new(700));
        assert_eq!(order.products.len(), 2);
        assert_eq!(last.cart.as_ref().unwrap().items.len(), 2);
        assert_eq!(last.page.page_name, "Checkout");

        // Cart cleared in memory and in the store, order id recorded
        assert_eq!(h.service.cart_item_count().await, 0);
        assert_eq!(h.store.get(keys::CART).unwrap().as_deref(), Some("[]"));
        assert_eq!(
            h.session.get(keys::ORDER_ID).unwrap().as_deref(),
            Some(receipt.order_id.as_str())
        );
    }

    #[tokio::test]
    async fn test_view_cart_emits_sc_view_even_when_empty() {
        let h = harness();
        h.service.hydrate().await;

        let view = h.service.view_cart().await;

        assert!(view.is_empty());
        let last = h.data_layer.last().unwrap();
        assert_eq!(last.event, EventKind::ScView);
        assert_eq!(last.page.page_name, "Cart");
        assert_eq!(last.cart.as_ref().unwrap().total, Price::new(0));
    }

    #[test]
    fn test_generated_order_id_format() {
        for _ in 0..100 {
            let id = generate_order_id();
            let suffix = id.as_str().strip_prefix(ORDER_ID_PREFIX).unwrap();
            let n: u32 = suffix.parse().unwrap();
            assert!(n < ORDER_ID_SPAN);
        }
    }
}
