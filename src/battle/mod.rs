//! Multiplayer battles against a remote server
//!
//! [`BattleClient`] submits a local Pokemon, polls the server until the
//! battle result is released and writes experience and damage back to the
//! local store.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod mock;
pub mod models;
pub mod reconcile;

pub use api::{BattleApi, FetchResponse, SubmitResponse};
pub use client::{BattleClient, ClientState};
pub use error::BattleError;
pub use http::HttpBattleApi;
pub use models::{BattleOutcome, BattleSessionId, BattleTick, MAX_EXP_GAIN, MIN_EXP_GAIN};
pub use reconcile::{reconcile, winner_uuid};
