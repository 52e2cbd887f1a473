use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::data::DatabaseError;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Battle server returned {status}: {body}")]
    Transport { status: StatusCode, body: String },

    #[error("Malformed battle server response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Battle server returned an empty session id")]
    EmptySession,

    #[error("Battle server returned no ticks")]
    EmptyResults,

    #[error("Local store error: {0}")]
    Store(#[from] DatabaseError),

    #[error("Already joined a battle with this client")]
    AlreadyJoined,

    #[error("Battle results were already collected")]
    AlreadyResolved,

    #[error("Waiting for battle results was cancelled")]
    Cancelled,

    #[error("No battle results after {0:?}")]
    PollTimedOut(Duration),

    #[error("Invalid battle client configuration: {0}")]
    Config(String),
}
