//! REST API endpoint tests

mod catalog_tests;
mod customer_tests;
mod health_tests;
mod wash_job_tests;
