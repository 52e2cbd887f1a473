//! End-to-end battle flow over HTTP
//!
//! HttpBattleApi -> scripted axum server -> reconcile -> SQLite

use axum::http::StatusCode;
use pocket_battle::battle::{MAX_EXP_GAIN, MIN_EXP_GAIN};
use pocket_battle::{BattleClient, BattleError, BattleTick, ClientState, Pokemon};
use serde_json::json;

use super::common::battle_server::{BattleServer, Script};
use super::common::fixtures::{seeded_store, test_config, POLL_INTERVAL};

fn scenario_results() -> serde_json::Value {
    json!([
        {"AttackerUuid": "B", "OpponentUuid": "A", "OpponentHealthAfterTick": 80},
        {"AttackerUuid": "A", "OpponentUuid": "B", "OpponentHealthAfterTick": 0}
    ])
}

fn pikachu() -> Pokemon {
    Pokemon::with_uuid("A", "Pikachu", 100)
}

#[tokio::test]
async fn test_full_battle_won() {
    let script = Script::joining("S1", scenario_results()).with_pending_polls(2);
    let server = BattleServer::spawn(script).await;
    let (_dir, db_path, store) = seeded_store();
    let mut client = BattleClient::from_config(&test_config(&server.url(), db_path)).unwrap();

    assert!(client.join_battle(&pikachu()).await.unwrap());
    assert_eq!(client.session().unwrap().as_str(), "S1");

    let ticks = client.await_results().await.unwrap().unwrap();
    assert_eq!(
        ticks,
        vec![BattleTick::new("B", "A", 80), BattleTick::new("A", "B", 0)]
    );

    // Two pending polls plus the one that returned results
    let fetches = server.fetches();
    assert_eq!(fetches.len(), 3);
    assert!(fetches.iter().all(|(session, _)| session == "S1"));
    for pair in fetches.windows(2) {
        assert!(pair[1].1.duration_since(pair[0].1) >= POLL_INTERVAL);
    }

    let outcome = client.outcome().unwrap();
    assert!(outcome.won);
    assert!((MIN_EXP_GAIN..=MAX_EXP_GAIN).contains(&outcome.exp));

    let a = store.get_by_uuid("A").unwrap().unwrap();
    assert_eq!(a.hp, 80);
    assert_eq!(a.exp, i64::from(outcome.exp));
    let b = store.get_by_uuid("B").unwrap().unwrap();
    assert_eq!((b.hp, b.exp), (100, 0));
    assert!(matches!(client.state(), ClientState::Resolved { .. }));
}

#[tokio::test]
async fn test_submit_sends_pokemon_as_json() {
    let server = BattleServer::spawn(Script::joining("S1", scenario_results())).await;
    let (_dir, db_path, _store) = seeded_store();
    let mut client = BattleClient::from_config(&test_config(&server.url(), db_path)).unwrap();

    client
        .join_battle(&Pokemon::with_uuid("A", "Pikachu", 100).with_exp(7))
        .await
        .unwrap();

    assert_eq!(
        server.submitted(),
        vec![json!({"Uuid": "A", "Name": "Pikachu", "Hp": 100, "Exp": 7})]
    );
    assert_eq!(
        server.submit_accept_headers(),
        vec![Some("application/json".to_string())]
    );
}

#[tokio::test]
async fn test_battle_lost() {
    let results = json!([
        {"AttackerUuid": "A", "OpponentUuid": "B", "OpponentHealthAfterTick": 30},
        {"AttackerUuid": "B", "OpponentUuid": "A", "OpponentHealthAfterTick": 0}
    ]);
    let server = BattleServer::spawn(Script::joining("S2", results)).await;
    let (_dir, db_path, store) = seeded_store();
    let mut client = BattleClient::from_config(&test_config(&server.url(), db_path)).unwrap();

    client.join_battle(&pikachu()).await.unwrap();
    client.await_results().await.unwrap();

    let outcome = client.outcome().unwrap();
    assert!(!outcome.won);
    assert_eq!(outcome.exp, 0);

    let a = store.get_by_uuid("A").unwrap().unwrap();
    assert_eq!((a.hp, a.exp), (0, 0));
    assert_eq!(store.get_by_uuid("B").unwrap().unwrap().hp, 100);
}

#[tokio::test]
async fn test_join_rejected_when_battle_ongoing() {
    let server = BattleServer::spawn(
        Script::joining("S1", scenario_results()).with_submit_status(StatusCode::NOT_FOUND),
    )
    .await;
    let (_dir, db_path, _store) = seeded_store();
    let mut client = BattleClient::from_config(&test_config(&server.url(), db_path)).unwrap();

    assert!(!client.join_battle(&pikachu()).await.unwrap());
    assert!(client.await_results().await.unwrap().is_none());
    assert!(server.fetches().is_empty());
}

#[tokio::test]
async fn test_join_server_error_is_transport_failure() {
    let server = BattleServer::spawn(
        Script::joining("S1", scenario_results())
            .with_submit_status(StatusCode::INTERNAL_SERVER_ERROR),
    )
    .await;
    let (_dir, db_path, _store) = seeded_store();
    let mut client = BattleClient::from_config(&test_config(&server.url(), db_path)).unwrap();

    match client.join_battle(&pikachu()).await {
        Err(BattleError::Transport { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            assert_eq!(body, "battle server unavailable");
        }
        other => panic!("Expected transport failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_results_propagate() {
    let server = BattleServer::spawn(
        Script::joining("S1", scenario_results()).with_raw_results("{\"not\": \"ticks\"}"),
    )
    .await;
    let (_dir, db_path, store) = seeded_store();
    let mut client = BattleClient::from_config(&test_config(&server.url(), db_path)).unwrap();

    client.join_battle(&pikachu()).await.unwrap();
    let err = client.await_results().await.unwrap_err();
    assert!(matches!(err, BattleError::Malformed(_)));
    assert!(client.outcome().is_none());
    assert_eq!(store.get_by_uuid("A").unwrap().unwrap().hp, 100);
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    // Bind and drop a listener to get a port nobody is serving
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let (_dir, db_path, _store) = seeded_store();
    let mut client =
        BattleClient::from_config(&test_config(&format!("http://{addr}"), db_path)).unwrap();

    assert!(matches!(
        client.join_battle(&pikachu()).await,
        Err(BattleError::Http(_))
    ));
}

#[tokio::test]
async fn test_any_non_ok_poll_status_is_retried() {
    let pending = [
        StatusCode::NOT_FOUND,
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::NO_CONTENT,
        StatusCode::ACCEPTED,
    ];
    let script = Script::joining("S1", scenario_results()).with_pending_statuses(&pending);
    let server = BattleServer::spawn(script).await;
    let (_dir, db_path, store) = seeded_store();
    let mut client = BattleClient::from_config(&test_config(&server.url(), db_path)).unwrap();

    client.join_battle(&pikachu()).await.unwrap();
    let ticks = client.await_results().await.unwrap().unwrap();

    assert_eq!(ticks.len(), 2);
    let fetches = server.fetches();
    assert_eq!(fetches.len(), pending.len() + 1);
    for pair in fetches.windows(2) {
        assert!(pair[1].1.duration_since(pair[0].1) >= POLL_INTERVAL);
    }
    assert!(client.outcome().unwrap().won);
    assert_eq!(store.get_by_uuid("A").unwrap().unwrap().hp, 80);
}

#[tokio::test]
async fn test_empty_session_id_is_rejected() {
    let server = BattleServer::spawn(Script::joining("", scenario_results())).await;
    let (_dir, db_path, _store) = seeded_store();
    let mut client = BattleClient::from_config(&test_config(&server.url(), db_path)).unwrap();

    assert!(matches!(
        client.join_battle(&pikachu()).await,
        Err(BattleError::EmptySession)
    ));
    assert_eq!(client.state(), &ClientState::NotJoined);
}

#[tokio::test]
async fn test_empty_results_leave_store_untouched() {
    let server = BattleServer::spawn(Script::joining("S1", json!([]))).await;
    let (_dir, db_path, store) = seeded_store();
    let mut client = BattleClient::from_config(&test_config(&server.url(), db_path)).unwrap();

    client.join_battle(&pikachu()).await.unwrap();
    assert!(matches!(
        client.await_results().await,
        Err(BattleError::EmptyResults)
    ));
    assert!(client.outcome().is_none());
    assert_eq!(server.fetches().len(), 1);
    let a = store.get_by_uuid("A").unwrap().unwrap();
    assert_eq!((a.hp, a.exp), (100, 0));
}
