//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **VehicleCategory**: hatch/sedan/suv/pickup price tier
//! - **PhotoKind / PhotoPaths**: upload classification and the comma-joined photo column

mod category;
mod photo;

pub use category::*;
pub use photo::*;
