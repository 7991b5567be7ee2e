//! Core business logic for gledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `ledger` - Double-entry balance rule, detail numbering, name rules
//! - `access` - Access tiers, role mapping and the per-operation tier table

pub mod access;
pub mod ledger;
