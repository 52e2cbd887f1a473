pub mod battle;
pub mod config;
pub mod data;
pub mod util;

pub use battle::{
    BattleApi, BattleClient, BattleError, BattleOutcome, BattleSessionId, BattleTick,
    ClientState, HttpBattleApi,
};
pub use config::Config;
pub use data::{Database, Pokemon, PokemonStore};
