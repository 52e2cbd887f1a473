//! Battle client: join, poll until ready, reconcile

use tokio_util::sync::CancellationToken;

use super::api::{BattleApi, FetchResponse, SubmitResponse};
use super::error::BattleError;
use super::http::HttpBattleApi;
use super::models::{BattleOutcome, BattleSessionId, BattleTick};
use super::reconcile::reconcile;
use crate::config::{BattleConfig, Config};
use crate::data::{Database, Pokemon, PokemonStore};

/// Where a client is in its single battle lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    NotJoined,
    Awaiting {
        pokemon_uuid: String,
        session: BattleSessionId,
    },
    Resolved {
        pokemon_uuid: String,
        session: BattleSessionId,
    },
}

/// Drives one multiplayer battle for one local Pokemon.
///
/// A client instance is good for exactly one battle:
/// `NotJoined -> Awaiting -> Resolved`.
pub struct BattleClient<A: BattleApi> {
    api: A,
    store: PokemonStore,
    config: BattleConfig,
    state: ClientState,
    outcome: Option<BattleOutcome>,
}

impl BattleClient<HttpBattleApi> {
    /// Build an HTTP client and open the local store described by `config`
    pub fn from_config(config: &Config) -> Result<Self, BattleError> {
        let api = HttpBattleApi::new(&config.server)?;
        let db = Database::open(config.database_path.clone())?;
        Ok(Self::new(api, PokemonStore::new(db), config.battle))
    }
}

impl<A: BattleApi> BattleClient<A> {
    pub fn new(api: A, store: PokemonStore, config: BattleConfig) -> Self {
        Self {
            api,
            store,
            config,
            state: ClientState::NotJoined,
            outcome: None,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Session id handed out by the server, once joined
    pub fn session(&self) -> Option<&BattleSessionId> {
        match &self.state {
            ClientState::NotJoined => None,
            ClientState::Awaiting { session, .. } | ClientState::Resolved { session, .. } => {
                Some(session)
            }
        }
    }

    /// Win/experience summary, available after `await_results` succeeds
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn store(&self) -> &PokemonStore {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Offer `pokemon` to the battle server.
    ///
    /// Returns `Ok(false)` when the server reports another battle in
    /// progress; the client stays unjoined and may try again.
    pub async fn join_battle(&mut self, pokemon: &Pokemon) -> Result<bool, BattleError> {
        if self.state != ClientState::NotJoined {
            return Err(BattleError::AlreadyJoined);
        }

        match self.api.submit(pokemon).await? {
            SubmitResponse::Rejected => {
                tracing::info!(
                    uuid = %pokemon.uuid,
                    "Battle join rejected, another battle is ongoing"
                );
                Ok(false)
            }
            SubmitResponse::Joined(session) => {
                tracing::info!(uuid = %pokemon.uuid, session = %session, "Joined battle");
                self.state = ClientState::Awaiting {
                    pokemon_uuid: pokemon.uuid.clone(),
                    session,
                };
                Ok(true)
            }
        }
    }

    /// Poll until the battle results are released, then reconcile them.
    ///
    /// Returns `Ok(None)` without contacting the server if no battle was
    /// joined. Polling has no attempt limit; set `poll_timeout` in the config
    /// or use [`Self::await_results_until`] to bound it.
    pub async fn await_results(&mut self) -> Result<Option<Vec<BattleTick>>, BattleError> {
        self.await_results_until(CancellationToken::new()).await
    }

    /// Like [`Self::await_results`], failing with `Cancelled` once `cancel` fires.
    ///
    /// Once results have been fetched the client is `Resolved`, even if
    /// writing them to the store fails.
    pub async fn await_results_until(
        &mut self,
        cancel: CancellationToken,
    ) -> Result<Option<Vec<BattleTick>>, BattleError> {
        let (pokemon_uuid, session) = match &self.state {
            ClientState::NotJoined => return Ok(None),
            ClientState::Resolved { .. } => return Err(BattleError::AlreadyResolved),
            ClientState::Awaiting {
                pokemon_uuid,
                session,
            } => (pokemon_uuid.clone(), session.clone()),
        };

        let ticks = match self.config.poll_timeout {
            Some(limit) => tokio::time::timeout(limit, self.poll_until_ready(&session, &cancel))
                .await
                .map_err(|_| BattleError::PollTimedOut(limit))??,
            None => self.poll_until_ready(&session, &cancel).await?,
        };

        // Resolved before any store write: a failed reconcile must not be
        // retried, or the winner's exp would be awarded twice
        self.state = ClientState::Resolved {
            pokemon_uuid: pokemon_uuid.clone(),
            session,
        };
        let outcome = reconcile(&self.store, &pokemon_uuid, &ticks, &mut rand::rng())?;
        self.outcome = Some(outcome);

        Ok(Some(ticks))
    }

    async fn poll_until_ready(
        &self,
        session: &BattleSessionId,
        cancel: &CancellationToken,
    ) -> Result<Vec<BattleTick>, BattleError> {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BattleError::Cancelled),
                response = self.api.fetch_results(session) => response?,
            };

            match response {
                FetchResponse::Ready(ticks) => {
                    tracing::info!(
                        session = %session,
                        attempts = attempt,
                        ticks = ticks.len(),
                        "Battle results received"
                    );
                    return Ok(ticks);
                }
                FetchResponse::Pending => {
                    tracing::debug!(session = %session, attempt, "Battle results pending");
                }
            }

            // Fixed delay between polls so the server is not hammered
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BattleError::Cancelled),
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }
}
