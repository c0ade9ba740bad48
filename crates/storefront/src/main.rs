//! Aurora Storefront - interactive demo shell.
//!
//! Drives the cart engine from a tiny command loop standing in for the
//! storefront UI: navigation commands move the current location, cart
//! commands call the mutator, and every command is forwarded to the data
//! layer as a `click` event the way the original document-level click
//! listener did.
//!
//! # Commands
//!
//! - `home`, `plp`, `pdp <id>`, `cart`, `checkout-page` - navigate
//! - `add <id>`, `inc <id>`, `dec <id>`, `rm <id>` - mutate the cart
//! - `checkout` - place the order and navigate to the confirmation page
//! - `quit` - exit

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::io::BufRead;
use std::sync::{Arc, Mutex};

use url::Url;

use aurora_core::Page;
use aurora_storefront::analytics::{AnalyticsEvent, AnalyticsSink, ClickEntry, JsonlDataLayer};
use aurora_storefront::badge::CountBadge;
use aurora_storefront::cart::CartService;
use aurora_storefront::catalog;
use aurora_storefront::config::StorefrontConfig;
use aurora_storefront::pages::{Location, PageContextSource};
use aurora_storefront::render::{CartRenderer, CartView, Notifier};
use aurora_storefront::store::{FileStore, KeyValueStore, MemoryStore, keys};

/// Badge printed to the terminal, remembering its text to skip redundant
/// writes.
#[derive(Default)]
struct TerminalBadge {
    text: Mutex<String>,
}

impl CountBadge for TerminalBadge {
    fn text(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn set_text(&self, text: &str) {
        let mut current = self
            .text
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = text.to_string();
        println!("  [badge] cart ({text})");
    }

    fn set_visible(&self, _visible: bool) {}
}

/// Cart page rendering to the terminal.
struct TerminalRenderer;

impl CartRenderer for TerminalRenderer {
    fn render(&self, view: &CartView) {
        if view.is_empty() {
            println!("  Your cart is empty.");
            return;
        }
        for item in &view.items {
            println!(
                "  {} ({}) - {} x {} = {}",
                item.name, item.category, item.price, item.quantity, item.line_total
            );
        }
        println!("  Total: {}", view.total);
    }
}

/// Blocking-alert analog.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        println!("  [alert] {message}");
    }
}

fn page_url(base: &str, page: Page, id: Option<&str>) -> Option<Url> {
    let path = match page {
        Page::Home => "index.html".to_string(),
        Page::Plp => "plp.html".to_string(),
        Page::Pdp => format!("pdp.html?id={}", id.unwrap_or_default()),
        Page::Cart => "cart.html".to_string(),
        Page::Checkout => "checkout.html".to_string(),
        Page::ThankYou => "thankyou.html".to_string(),
    };
    Url::parse(&format!("{base}/{path}")).ok()
}

fn print_catalog() {
    for product in catalog::all() {
        println!(
            "  [{}] {} ({}) - {}",
            product.id, product.name, product.category, product.price
        );
    }
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "aurora_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::new(&config.data_dir).expect("Failed to open persistent store"),
    );
    let session: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let location = Arc::new(Location::new(
        Url::parse(&format!("{}/index.html", config.base_url)).expect("Invalid base URL"),
    ));

    // Absent data-layer path disables emission entirely
    let data_layer: Option<Arc<dyn AnalyticsSink>> = match &config.data_layer_path {
        Some(path) => match JsonlDataLayer::open(path) {
            Ok(layer) => Some(Arc::new(layer)),
            Err(e) => {
                tracing::warn!("Failed to open data layer, events disabled: {e}");
                None
            }
        },
        None => None,
    };

    let mut service = CartService::new(
        &config,
        store,
        Arc::clone(&session) as Arc<dyn KeyValueStore>,
        Arc::clone(&location) as Arc<dyn PageContextSource>,
    )
    .with_badges(vec![Arc::new(TerminalBadge::default())])
    .with_renderer(Arc::new(TerminalRenderer))
    .with_notifier(Arc::new(TerminalNotifier));
    if let Some(layer) = &data_layer {
        service = service.with_data_layer(Arc::clone(layer));
    }

    service.hydrate().await;
    tracing::info!("Cart hydrated, {} item(s)", service.cart_item_count().await);

    println!("Aurora demo storefront. Commands: home plp pdp <id> cart checkout-page");
    println!("add <id>, inc <id>, dec <id>, rm <id>, checkout, quit");
    print_catalog();

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let arg = parts.next();

        // Forward the interaction as a click event, as the global click
        // listener did in the original client
        if let Some(layer) = &data_layer {
            layer.push(AnalyticsEvent::click(
                &location.current(),
                ClickEntry {
                    element_text: line.trim().to_string(),
                    tag_name: "BUTTON".to_string(),
                },
            ));
        }

        match (command, arg) {
            ("home", _) => navigate(&location, &config.base_url, Page::Home, None),
            ("plp", _) => {
                navigate(&location, &config.base_url, Page::Plp, None);
                print_catalog();
            }
            ("pdp", Some(id)) => navigate(&location, &config.base_url, Page::Pdp, Some(id)),
            ("cart", _) => {
                navigate(&location, &config.base_url, Page::Cart, None);
                service.view_cart().await;
            }
            ("checkout-page", _) => navigate(&location, &config.base_url, Page::Checkout, None),
            ("add", Some(id)) => match catalog::find(id) {
                Some(product) => {
                    if let Err(e) = service.add_item(product).await {
                        println!("  error: {e}");
                    }
                }
                None => println!("  no such product: {id}"),
            },
            ("inc", Some(id)) => service.update_quantity(id, 1).await,
            ("dec", Some(id)) => service.update_quantity(id, -1).await,
            ("rm", Some(id)) => service.remove_item(id).await,
            ("checkout", _) => match service.checkout().await {
                Ok(receipt) => {
                    navigate(&location, &config.base_url, receipt.redirect, None);
                    let order_id = session
                        .get(keys::ORDER_ID)
                        .ok()
                        .flatten()
                        .unwrap_or_else(|| receipt.order_id.to_string());
                    println!("  Thank you! Order {order_id}, total {}", receipt.revenue);
                }
                Err(e) => println!("  error: {e}"),
            },
            ("quit" | "exit", _) => break,
            _ => println!("  unknown command: {line}"),
        }
    }

    // Let a pending badge write settle before exiting
    tokio::time::sleep(config.badge_debounce * 2).await;
}

fn navigate(location: &Location, base: &str, page: Page, id: Option<&str>) {
    if let Some(url) = page_url(base, page, id) {
        location.navigate(url);
        println!("-- {page} --");
    }
}
