//! Structured analytics events and the data-layer sink.
//!
//! Events mirror the data-layer schema consumed by the downstream analytics
//! pipeline: a tag, an `eventInfo` block, page context, and optional
//! product/cart/order/click sections, all camelCase on the wire with an RFC
//! 3339 timestamp.
//!
//! The sink is append-only. When no sink is configured, events are dropped
//! silently - never queued, never retried.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aurora_core::{Cart, LineItem, OrderId, Price};

use crate::pages::PageInfo;

/// Event tags understood by the data-layer consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "click")]
    Click,
    #[serde(rename = "scAdd")]
    ScAdd,
    #[serde(rename = "scView")]
    ScView,
    #[serde(rename = "scUpdate")]
    ScUpdate,
    #[serde(rename = "scRemove")]
    ScRemove,
    #[serde(rename = "purchase")]
    Purchase,
}

impl EventKind {
    /// The literal tag value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::ScAdd => "scAdd",
            Self::ScView => "scView",
            Self::ScUpdate => "scUpdate",
            Self::ScRemove => "scRemove",
            Self::Purchase => "purchase",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `eventInfo` block; carries the tag again as `eventName`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub event_name: EventKind,
}

/// Page context as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    pub page_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    pub url: String,
}

impl From<&PageInfo> for PageEnvelope {
    fn from(info: &PageInfo) -> Self {
        Self {
            page_name: info.page_name.clone(),
            page_type: info.page_type.map(|p| p.page_type().to_string()),
            url: info.url.clone(),
        }
    }
}

/// A line-item projection inside `product`, `cart.items`, or
/// `order.products`.
///
/// `scUpdate` historically carried only id, name, and quantity; the optional
/// fields are omitted from the wire in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntry {
    pub product_id: String,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    pub quantity: u32,
}

impl ProductEntry {
    /// Full projection of a line item.
    #[must_use]
    pub fn from_line(item: &LineItem) -> Self {
        Self {
            product_id: item.id.clone(),
            product_name: item.name.clone(),
            product_category: Some(item.category.clone()),
            brand: Some(item.brand.clone()),
            price: Some(item.price),
            quantity: item.qty,
        }
    }

    /// Full projection of a product with an explicit (post-mutation)
    /// quantity, used by `scAdd`.
    #[must_use]
    pub fn from_product(product: &aurora_core::Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_category: Some(product.category.clone()),
            brand: Some(product.brand.clone()),
            price: Some(product.price),
            quantity,
        }
    }

    /// Brief projection (id, name, quantity) used by `scUpdate`.
    #[must_use]
    pub fn brief(item: &LineItem) -> Self {
        Self {
            product_id: item.id.clone(),
            product_name: item.name.clone(),
            product_category: None,
            brand: None,
            price: None,
            quantity: item.qty,
        }
    }
}

/// Full cart snapshot: all line items plus the derived total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<ProductEntry>,
    pub total: Price,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(ProductEntry::from_line).collect(),
            total: cart.total(),
        }
    }
}

/// The `order` section of a purchase event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: OrderId,
    pub revenue: Price,
    pub products: Vec<ProductEntry>,
}

/// The `click` section of a forwarded click event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEntry {
    pub element_text: String,
    pub tag_name: String,
}

/// A structured analytics event, produced once per interaction and appended
/// to the data layer. Never stored by this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event: EventKind,
    pub event_info: EventInfo,
    pub page: PageEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Vec<ProductEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<ClickEntry>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    fn base(kind: EventKind, page: &PageInfo) -> Self {
        Self {
            event: kind,
            event_info: EventInfo { event_name: kind },
            page: PageEnvelope::from(page),
            product: None,
            cart: None,
            order: None,
            click: None,
            timestamp: Utc::now(),
        }
    }

    /// `scAdd`: the added product with its post-mutation quantity, plus the
    /// cart snapshot.
    #[must_use]
    pub fn sc_add(page: &PageInfo, product: ProductEntry, cart: CartSnapshot) -> Self {
        Self {
            product: Some(vec![product]),
            cart: Some(cart),
            ..Self::base(EventKind::ScAdd, page)
        }
    }

    /// `scView`: a cart page view, emitted even for an empty cart.
    #[must_use]
    pub fn sc_view(page: &PageInfo, cart: CartSnapshot) -> Self {
        Self {
            cart: Some(cart),
            ..Self::base(EventKind::ScView, page)
        }
    }

    /// `scUpdate`: the updated line item (brief projection) plus the cart
    /// snapshot.
    #[must_use]
    pub fn sc_update(page: &PageInfo, product: ProductEntry, cart: CartSnapshot) -> Self {
        Self {
            product: Some(vec![product]),
            cart: Some(cart),
            ..Self::base(EventKind::ScUpdate, page)
        }
    }

    /// `scRemove`: the removed item's pre-removal fields plus the
    /// post-removal cart snapshot.
    #[must_use]
    pub fn sc_remove(page: &PageInfo, product: ProductEntry, cart: CartSnapshot) -> Self {
        Self {
            product: Some(vec![product]),
            cart: Some(cart),
            ..Self::base(EventKind::ScRemove, page)
        }
    }

    /// `purchase`: order id, revenue, and the pre-clear product/cart
    /// snapshot.
    #[must_use]
    pub fn purchase(page: &PageInfo, order: OrderSnapshot, cart: CartSnapshot) -> Self {
        Self {
            order: Some(order),
            cart: Some(cart),
            ..Self::base(EventKind::Purchase, page)
        }
    }

    /// `click`: generic interaction forwarding.
    #[must_use]
    pub fn click(page: &PageInfo, click: ClickEntry) -> Self {
        Self {
            click: Some(click),
            ..Self::base(EventKind::Click, page)
        }
    }
}

/// An append-only data-layer sink.
///
/// Pushes must not fail upward: a sink that cannot record an event logs and
/// drops it.
pub trait AnalyticsSink: Send + Sync {
    fn push(&self, event: AnalyticsEvent);
}

/// In-memory data layer for tests and the sink-less demo configuration.
#[derive(Debug, Default)]
pub struct MemoryDataLayer {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemoryDataLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events pushed so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of events pushed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recently pushed event, if any.
    #[must_use]
    pub fn last(&self) -> Option<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl AnalyticsSink for MemoryDataLayer {
    fn push(&self, event: AnalyticsEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
    }
}

/// File-backed data layer: one JSON object per line, appended.
#[derive(Debug)]
pub struct JsonlDataLayer {
    file: Mutex<File>,
}

impl JsonlDataLayer {
    /// Open (or create) the data-layer file for appending.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AnalyticsSink for JsonlDataLayer {
    fn push(&self, event: AnalyticsEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to serialize analytics event: {e}");
                return;
            }
        };

        let mut file = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writeln!(file, "{line}") {
            tracing::warn!(event = %event.event, "Dropping analytics event: {e}");
        }
    }
}
