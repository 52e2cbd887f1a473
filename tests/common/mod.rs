//! Shared test utilities
//!
//! - Scripted HTTP battle server
//! - Seeded Pokemon stores and configs
