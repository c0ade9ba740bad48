//! Page classification and navigation context.
//!
//! Analytics payloads carry the page a visitor was on when an event fired.
//! [`classify`] maps a navigation URL onto a [`Page`], and
//! [`PageContextSource`] is the seam through which the cart engine reads the
//! current location without owning navigation itself.

use std::sync::Mutex;

use url::Url;

use aurora_core::Page;

/// Classify a navigation URL into a storefront page.
///
/// Follows the original URL shapes: `pdp.html` (or an `id=` query) is a
/// product page, the `*.html` names map to their pages, anything else is
/// home.
#[must_use]
pub fn classify(url: &Url) -> Page {
    let path = url.path();
    let has_id_query = url.query().is_some_and(|q| q.contains("id="));

    if path.contains("pdp.html") || has_id_query {
        Page::Pdp
    } else if path.contains("plp.html") {
        Page::Plp
    } else if path.contains("cart.html") {
        Page::Cart
    } else if path.contains("checkout.html") {
        Page::Checkout
    } else if path.contains("thankyou.html") {
        Page::ThankYou
    } else {
        Page::Home
    }
}

/// Page context attached to an analytics event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Display name, e.g. `"Cart"`.
    pub page_name: String,
    /// Lowercase page type; absent for contexts that never carried one.
    pub page_type: Option<Page>,
    /// The full navigation URL.
    pub url: String,
}

impl PageInfo {
    /// Build the context for a URL by classifying it.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let page = classify(url);
        Self {
            page_name: page.page_name().to_string(),
            page_type: Some(page),
            url: url.to_string(),
        }
    }

    /// Cart-page context with the given current URL. Cart mutations report
    /// the cart page regardless of where navigation sits.
    #[must_use]
    pub fn cart_page(url: &str) -> Self {
        Self::fixed(Page::Cart, url)
    }

    /// Checkout-page context with the given current URL.
    #[must_use]
    pub fn checkout_page(url: &str) -> Self {
        Self::fixed(Page::Checkout, url)
    }

    fn fixed(page: Page, url: &str) -> Self {
        Self {
            page_name: page.page_name().to_string(),
            page_type: Some(page),
            url: url.to_string(),
        }
    }
}

/// Supplies the current navigation location to the cart engine.
pub trait PageContextSource: Send + Sync {
    /// The context for the page the visitor is currently on.
    fn current(&self) -> PageInfo;
}

/// A mutable location, navigated by the demo shell.
#[derive(Debug)]
pub struct Location {
    url: Mutex<Url>,
}

impl Location {
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            url: Mutex::new(url),
        }
    }

    /// Navigate to a new URL.
    pub fn navigate(&self, url: Url) {
        let mut current = self
            .url
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = url;
    }

    /// The current URL.
    #[must_use]
    pub fn url(&self) -> Url {
        self.url
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl PageContextSource for Location {
    fn current(&self) -> PageInfo {
        PageInfo::from_url(&self.url())
    }
}
