//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database pool and repositories (PostgreSQL)
//! - Photo storage on the local filesystem
//! - Receipt PDF rendering
//! - Prometheus metrics

pub mod database;
pub mod metrics;
pub mod receipt;
pub mod repositories;
pub mod storage;
