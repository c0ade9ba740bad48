//! Aurora Core - Shared types library.
//!
//! This crate provides the domain types used across the Aurora demo
//! storefront components:
//! - `storefront` - Cart engine, analytics emission, and the demo shell
//! - `integration-tests` - Cross-crate scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! timers, no analytics sinks. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, cart line items, prices, order ids, and pages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
