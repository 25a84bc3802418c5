//! # Domain Services
//!
//! Domain services encapsulate business logic that doesn't naturally
//! belong to a single entity.
//!
//! ## Services
//!
//! - **PricingService**: suggested price, product dose cost, labor cost, profit
//! - **WashCosting**: the completion figures of a wash job
//! - **PhotoStorage**: port for persisting uploaded photos

mod photo_storage;
mod pricing;

pub use photo_storage::*;
pub use pricing::*;
