//! Core types for Dewdrop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod skin;

pub use id::*;
pub use price::Price;
pub use skin::{Sensitivity, SkinConcern, SkinType, TagError};
