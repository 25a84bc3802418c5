//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod catalog;
pub mod customer;
pub mod health;
pub mod report;
pub mod vehicle;
pub mod wash_job;
