//! Property tests for battle reconciliation
//!
//! The local Pokemon is always "A". "B" is stored locally too, "C" is not.

use pocket_battle::battle::{reconcile, BattleTick, MAX_EXP_GAIN, MIN_EXP_GAIN};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::common::fixtures::seeded_store;

fn any_uuid() -> impl Strategy<Value = String> {
    prop_oneof![Just("A"), Just("B"), Just("C")].prop_map(str::to_string)
}

fn any_tick() -> impl Strategy<Value = BattleTick> {
    (any_uuid(), any_uuid(), 0i64..=100)
        .prop_map(|(attacker, opponent, hp)| BattleTick::new(attacker, opponent, hp))
}

fn ticks_won_by(attacker: &'static str) -> impl Strategy<Value = Vec<BattleTick>> {
    (prop::collection::vec(any_tick(), 0..12), any_uuid(), 0i64..=100).prop_map(
        move |(mut ticks, opponent, hp)| {
            ticks.push(BattleTick::new(attacker, opponent, hp));
            ticks
        },
    )
}

fn ticks_won_by_other() -> impl Strategy<Value = Vec<BattleTick>> {
    prop_oneof![ticks_won_by("B"), ticks_won_by("C")]
}

fn expected_hp(ticks: &[BattleTick]) -> i64 {
    ticks
        .iter()
        .rev()
        .find(|tick| tick.opponent_uuid == "A")
        .map(|tick| tick.opponent_health_after_tick)
        .unwrap_or(100)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn own_win_awards_exp_in_range(ticks in ticks_won_by("A"), seed in any::<u64>()) {
        let (_dir, _path, store) = seeded_store();
        let outcome = reconcile(&store, "A", &ticks, &mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert!(outcome.won);
        prop_assert!((MIN_EXP_GAIN..=MAX_EXP_GAIN).contains(&outcome.exp));
        let a = store.get_by_uuid("A").unwrap().unwrap();
        prop_assert_eq!(a.exp, i64::from(outcome.exp));
    }

    #[test]
    fn other_winner_means_loss(ticks in ticks_won_by_other(), seed in any::<u64>()) {
        let (_dir, _path, store) = seeded_store();
        let outcome = reconcile(&store, "A", &ticks, &mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert!(!outcome.won);
        prop_assert_eq!(outcome.exp, 0);
        prop_assert_eq!(store.get_by_uuid("A").unwrap().unwrap().exp, 0);
    }

    #[test]
    fn last_hit_on_own_pokemon_sets_health(ticks in prop::collection::vec(any_tick(), 1..16)) {
        let (_dir, _path, store) = seeded_store();
        reconcile(&store, "A", &ticks, &mut StdRng::seed_from_u64(1)).unwrap();

        prop_assert_eq!(store.get_by_uuid("A").unwrap().unwrap().hp, expected_hp(&ticks));
    }

    #[test]
    fn other_records_never_written(ticks in prop::collection::vec(any_tick(), 1..16)) {
        let (_dir, _path, store) = seeded_store();
        reconcile(&store, "A", &ticks, &mut StdRng::seed_from_u64(2)).unwrap();

        let b = store.get_by_uuid("B").unwrap().unwrap();
        prop_assert_eq!((b.hp, b.exp), (100, 0));
        prop_assert!(store.get_by_uuid("C").unwrap().is_none());
    }
}
