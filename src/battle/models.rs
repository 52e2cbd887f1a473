//! Wire and result types for a multiplayer battle

use serde::{Deserialize, Serialize};

/// Opaque token correlating a submitted Pokemon with its battle on the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattleSessionId(String);

impl BattleSessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BattleSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded exchange: `attacker_uuid` hit `opponent_uuid`, leaving it at
/// `opponent_health_after_tick`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BattleTick {
    pub attacker_uuid: String,
    pub opponent_uuid: String,
    pub opponent_health_after_tick: i64,
}

impl BattleTick {
    pub fn new(
        attacker_uuid: impl Into<String>,
        opponent_uuid: impl Into<String>,
        opponent_health_after_tick: i64,
    ) -> Self {
        Self {
            attacker_uuid: attacker_uuid.into(),
            opponent_uuid: opponent_uuid.into(),
            opponent_health_after_tick,
        }
    }
}

/// Lowest experience a winner can be awarded
pub const MIN_EXP_GAIN: u32 = 1;
/// Highest experience a winner can be awarded
pub const MAX_EXP_GAIN: u32 = 100;

/// Win/loss summary computed locally once results arrive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BattleOutcome {
    pub won: bool,
    /// Experience added to the local Pokemon; 0 unless `won`
    pub exp: u32,
}

impl BattleOutcome {
    pub fn lost() -> Self {
        Self::default()
    }

    pub fn won(exp: u32) -> Self {
        Self { won: true, exp }
    }
}
