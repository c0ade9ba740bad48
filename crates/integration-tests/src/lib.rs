//! Integration tests for the Aurora demo storefront.
//!
//! # Test Categories
//!
//! - `cart_flow` - Full shopping journeys through the cart engine and the
//!   analytics event stream they produce
//! - `persistence` - Cart survival across service restarts over the
//!   file-backed store
//!
//! The tests live in `tests/`; this library only hosts shared helpers.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;

use aurora_storefront::render::{CartRenderer, CartView, Notifier};

/// Renderer double that records every projected view.
#[derive(Default)]
pub struct RecordingRenderer {
    views: Mutex<Vec<CartView>>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Views rendered so far, in order.
    #[must_use]
    pub fn views(&self) -> Vec<CartView> {
        self.views
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl CartRenderer for RecordingRenderer {
    fn render(&self, view: &CartView) {
        self.views
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(view.clone());
    }
}

/// Notifier double that records every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages shown so far, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(message.to_string());
    }
}
