//! Data persistence layer
//!
//! SQLite-backed storage for the player's Pokemon. Every store call opens its
//! own connection and closes it when the call returns.

mod database;
mod migrations;
mod models;
mod pokemon;

pub use database::{Database, DatabaseError};
pub use models::{Pokemon, DEFAULT_HP};
pub use pokemon::PokemonStore;
