//! HTTP implementation of the battle server channel

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};

use super::api::{BattleApi, FetchResponse, SubmitResponse};
use super::error::BattleError;
use super::models::{BattleSessionId, BattleTick};
use crate::config::ServerConfig;
use crate::data::Pokemon;

/// Talks to the battle server's REST endpoints:
/// `POST /api/Battle` and `GET /api/battle/{session}`.
#[derive(Clone, Debug)]
pub struct HttpBattleApi {
    base_url: Url,
    client: Client,
}

impl HttpBattleApi {
    pub fn new(config: &ServerConfig) -> Result<Self, BattleError> {
        let base_url = Url::parse(&config.url).map_err(|err| {
            BattleError::Config(format!("invalid server url {}: {err}", config.url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(BattleError::Config(format!(
                "server url {} cannot be used as a base",
                config.url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if config.accept_invalid_certs {
            tracing::warn!(
                url = %base_url,
                "TLS certificate validation disabled for battle server"
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BattleError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                BattleError::Config(format!("server url {} cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl BattleApi for HttpBattleApi {
    async fn submit(&self, pokemon: &Pokemon) -> Result<SubmitResponse, BattleError> {
        let url = self.endpoint(&["api", "Battle"])?;
        let response = self.client.post(url).json(pokemon).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(SubmitResponse::Rejected);
        }

        let text = response.text().await?;
        if !status.is_success() {
            return Err(BattleError::Transport { status, body: text });
        }

        // The body is a JSON string literal, not the bare id
        let session: BattleSessionId = serde_json::from_str(&text)?;
        if session.as_str().trim().is_empty() {
            return Err(BattleError::EmptySession);
        }
        Ok(SubmitResponse::Joined(session))
    }

    async fn fetch_results(
        &self,
        session: &BattleSessionId,
    ) -> Result<FetchResponse, BattleError> {
        let url = self.endpoint(&["api", "battle", session.as_str()])?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::trace!(session = %session, %status, "Battle results not ready");
            return Ok(FetchResponse::Pending);
        }

        let text = response.text().await?;
        let ticks: Vec<BattleTick> = serde_json::from_str(&text)?;
        Ok(FetchResponse::Ready(ticks))
    }
}
