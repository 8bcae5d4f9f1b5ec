//! Client library for an HR hourly rate service.
//!
//! This crate provides a typed HTTP client for managing employees' hourly
//! rates (create, approve, list, history), local previews of the monthly
//! salary equivalent, wage validation, currency formatting and a
//! time-bounded cache for the service's shared payroll configuration.

#![warn(missing_docs)]

pub mod cache;
pub mod calculation;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
