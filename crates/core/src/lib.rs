//! Core business logic for Gurukul.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `fees` - Fee ledger arithmetic, receipt numbering, amount-in-words
//! - `auth` - Password hashing and operator roles

pub mod auth;
pub mod fees;
