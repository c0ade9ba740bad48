//! Aurora Storefront library.
//!
//! This crate provides the cart engine as a library, allowing it to be
//! tested and reused without the interactive demo shell.
//!
//! # Architecture
//!
//! - [`cart::CartService`] owns the cart state and is the only mutation path
//! - [`store`] is the persistent/ephemeral key-value seam (`localStorage`
//!   and `sessionStorage` analogs)
//! - [`analytics`] builds structured events and appends them to an optional
//!   data-layer sink
//! - [`badge`] coalesces rapid count updates behind a cancellable timer
//! - [`render`] projects cart state into display views; rendering never
//!   mutates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod badge;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod pages;
pub mod render;
pub mod store;
