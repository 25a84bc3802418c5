//! Integration Tests Entry Point
//!
//! Tests are organized by module:
//! - `api/` - REST API endpoint tests
//! - `repositories/` - SQL behaviour against PostgreSQL (ignored by default)
//! - `common/` - Shared test utilities

mod api;
mod common;
mod repositories;

pub use common::*;
