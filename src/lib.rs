//! BizHub multi-tenant business platform.
//!
//! This crate provides the tenant-scoped core of a business management
//! platform: transportation and parcel-delivery pricing, clinic patients
//! and VIP-discounted bills, F&B orders and reservations, credit wallets
//! with an approval ledger, and pausable session timers, served over a
//! JSON HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod maintenance;
pub mod models;
pub mod pricing;
pub mod rules;
pub mod store;
