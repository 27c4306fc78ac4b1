//! Dewdrop Core - Shared types library.
//!
//! This crate provides common types used by the Dewdrop storefront (cart,
//! skin quiz, and search).
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, and skin quiz tags

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
