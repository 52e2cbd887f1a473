//! Scripted battle server channel for deterministic testing
//!
//! Implements [`BattleApi`] without any network traffic. Submit and fetch
//! replies are configured up front and every call is recorded so tests can
//! assert on how the client drove the server.
//!
//! # Example
//! ```no_run
//! use pocket_battle::battle::mock::MockBattleApi;
//! use pocket_battle::battle::BattleTick;
//!
//! let api = MockBattleApi::joining("S1")
//!     .with_pending_polls(3)
//!     .with_ticks(vec![BattleTick::new("a", "b", 0)]);
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;

use super::api::{BattleApi, FetchResponse, SubmitResponse};
use super::error::BattleError;
use super::models::{BattleSessionId, BattleTick};
use crate::data::Pokemon;

/// Reply to hand back from `submit`
#[derive(Clone, Debug)]
pub enum MockSubmit {
    Join(BattleSessionId),
    Reject,
    /// Non-success status other than 404
    Fail(StatusCode),
}

/// Mock battle server channel
#[derive(Clone)]
pub struct MockBattleApi {
    submit_reply: MockSubmit,
    polls: Arc<Mutex<VecDeque<FetchResponse>>>,
    /// Served once the scripted polls run out (None = stay pending forever)
    final_ticks: Option<Vec<BattleTick>>,
    submitted: Arc<Mutex<Vec<Pokemon>>>,
    fetches: Arc<Mutex<Vec<(BattleSessionId, Instant)>>>,
}

impl MockBattleApi {
    /// A server that accepts the submission with this session id
    pub fn joining(session: impl Into<String>) -> Self {
        Self::with_submit(MockSubmit::Join(BattleSessionId::new(session)))
    }

    /// A server that reports another battle in progress
    pub fn rejecting() -> Self {
        Self::with_submit(MockSubmit::Reject)
    }

    /// A server whose submit endpoint fails with `status`
    pub fn failing(status: StatusCode) -> Self {
        Self::with_submit(MockSubmit::Fail(status))
    }

    fn with_submit(submit_reply: MockSubmit) -> Self {
        Self {
            submit_reply,
            polls: Arc::new(Mutex::new(VecDeque::new())),
            final_ticks: None,
            submitted: Arc::new(Mutex::new(Vec::new())),
            fetches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer the first `count` polls with "not ready"
    pub fn with_pending_polls(self, count: usize) -> Self {
        self.polls
            .lock()
            .extend(std::iter::repeat(FetchResponse::Pending).take(count));
        self
    }

    /// Ticks returned once the pending polls are used up
    pub fn with_ticks(mut self, ticks: Vec<BattleTick>) -> Self {
        self.final_ticks = Some(ticks);
        self
    }

    /// Pokemon passed to `submit`, in call order
    pub fn submitted(&self) -> Vec<Pokemon> {
        self.submitted.lock().clone()
    }

    /// Number of `fetch_results` calls so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().len()
    }

    /// Session ids and arrival times of every `fetch_results` call
    pub fn fetches(&self) -> Vec<(BattleSessionId, Instant)> {
        self.fetches.lock().clone()
    }
}

#[async_trait]
impl BattleApi for MockBattleApi {
    async fn submit(&self, pokemon: &Pokemon) -> Result<SubmitResponse, BattleError> {
        self.submitted.lock().push(pokemon.clone());
        match &self.submit_reply {
            MockSubmit::Join(session) => Ok(SubmitResponse::Joined(session.clone())),
            MockSubmit::Reject => Ok(SubmitResponse::Rejected),
            MockSubmit::Fail(status) => Err(BattleError::Transport {
                status: *status,
                body: "mock failure".into(),
            }),
        }
    }

    async fn fetch_results(
        &self,
        session: &BattleSessionId,
    ) -> Result<FetchResponse, BattleError> {
        self.fetches.lock().push((session.clone(), Instant::now()));
        if let Some(scripted) = self.polls.lock().pop_front() {
            return Ok(scripted);
        }
        Ok(match &self.final_ticks {
            Some(ticks) => FetchResponse::Ready(ticks.clone()),
            None => FetchResponse::Pending,
        })
    }
}
