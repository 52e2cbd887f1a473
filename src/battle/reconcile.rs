//! Applying a finished battle to the local store

use rand::Rng;

use super::error::BattleError;
use super::models::{BattleOutcome, BattleTick, MAX_EXP_GAIN, MIN_EXP_GAIN};
use crate::data::PokemonStore;

/// The winner is whoever landed the final tick
pub fn winner_uuid(ticks: &[BattleTick]) -> Option<&str> {
    ticks.last().map(|tick| tick.attacker_uuid.as_str())
}

/// Decide the outcome for `own_uuid` and write experience and damage back.
///
/// Only the record with `own_uuid` is ever written. Unknown uuids are
/// skipped. Every write is its own transaction, applied in tick order, so the
/// last tick that hit us sets the stored health.
pub fn reconcile<R>(
    store: &PokemonStore,
    own_uuid: &str,
    ticks: &[BattleTick],
    rng: &mut R,
) -> Result<BattleOutcome, BattleError>
where
    R: Rng,
{
    let winner = winner_uuid(ticks).ok_or(BattleError::EmptyResults)?;
    let mut outcome = BattleOutcome::lost();

    let winner_record = store.modify(winner, |pokemon| {
        if pokemon.uuid != own_uuid {
            return false;
        }
        let gain = rng.random_range(MIN_EXP_GAIN..=MAX_EXP_GAIN);
        pokemon.exp += i64::from(gain);
        outcome = BattleOutcome::won(gain);
        true
    })?;

    match winner_record {
        None => tracing::debug!(winner, "Winner not in local store, no outcome recorded"),
        Some(pokemon) if outcome.won => tracing::info!(
            uuid = %pokemon.uuid,
            exp_gain = outcome.exp,
            exp = pokemon.exp,
            "Battle won"
        ),
        Some(_) => tracing::info!(winner, "Battle lost"),
    }

    for (index, tick) in ticks.iter().enumerate() {
        if tick.opponent_uuid != own_uuid {
            continue;
        }
        let hp = tick.opponent_health_after_tick;
        let updated = store.modify(&tick.opponent_uuid, |pokemon| {
            pokemon.hp = hp;
            true
        })?;
        if updated.is_some() {
            tracing::debug!(tick = index, hp, "Applied damage to local Pokemon");
        }
    }

    Ok(outcome)
}
