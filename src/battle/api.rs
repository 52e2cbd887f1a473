use async_trait::async_trait;

use super::error::BattleError;
use super::models::{BattleSessionId, BattleTick};
use crate::data::Pokemon;

/// Result of offering a Pokemon to the battle server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResponse {
    /// Accepted; poll with this session id
    Joined(BattleSessionId),
    /// Another battle is in progress and cannot be joined
    Rejected,
}

/// Result of a single poll for battle results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResponse {
    Ready(Vec<BattleTick>),
    Pending,
}

/// Request/response channel to the remote battle server
#[async_trait]
pub trait BattleApi: Send + Sync {
    /// Submit a Pokemon to join the current battle
    async fn submit(&self, pokemon: &Pokemon) -> Result<SubmitResponse, BattleError>;

    /// Fetch the ordered tick list for a session, or `Pending` if not ready
    async fn fetch_results(&self, session: &BattleSessionId)
        -> Result<FetchResponse, BattleError>;
}
