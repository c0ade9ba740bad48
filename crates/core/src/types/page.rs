//! Storefront page classification.

use serde::{Deserialize, Serialize};

/// The storefront pages a visitor can be on.
///
/// Analytics payloads carry both a display name (`PDP`) and a lowercase page
/// type (`pdp`); both are fixed per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Home,
    Plp,
    Pdp,
    Cart,
    Checkout,
    ThankYou,
}

impl Page {
    /// Display name used as the analytics `pageName`.
    #[must_use]
    pub const fn page_name(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Plp => "PLP",
            Self::Pdp => "PDP",
            Self::Cart => "Cart",
            Self::Checkout => "Checkout",
            Self::ThankYou => "ThankYou",
        }
    }

    /// Lowercase variant used as the analytics `pageType`.
    #[must_use]
    pub const fn page_type(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Plp => "plp",
            Self::Pdp => "pdp",
            Self::Cart => "cart",
            Self::Checkout => "checkout",
            Self::ThankYou => "thankyou",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.page_name())
    }
}
