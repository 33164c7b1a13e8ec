//! Tests for `WsManager` connection bookkeeping and team-scoped delivery.
//!
//! No HTTP upgrades are performed; connections are registered directly and
//! their receiver halves inspected.

use axum::extract::ws::Message;
use boardhub_api::ws::WsManager;
use uuid::Uuid;

fn team(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn user(n: u128) -> Uuid {
    Uuid::from_u128(1000 + n)
}

// ---------------------------------------------------------------------------
// Test: add/remove bookkeeping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_and_remove_track_connection_count() {
    let manager = WsManager::new();
    assert_eq!(manager.connection_count().await, 0);

    let _rx1 = manager.add("conn-1".to_string(), user(1)).await;
    let _rx2 = manager.add("conn-2".to_string(), user(2)).await;
    assert_eq!(manager.connection_count().await, 2);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("nonexistent").await;
    assert_eq!(manager.connection_count().await, 1);
}

#[tokio::test]
async fn duplicate_id_replaces_previous_connection() {
    let manager = WsManager::new();

    let _rx_old = manager.add("conn-1".to_string(), user(1)).await;
    let mut rx_new = manager.add("conn-1".to_string(), user(2)).await;
    assert_eq!(manager.connection_count().await, 1);
    assert_eq!(manager.user_of("conn-1").await, Some(user(2)));

    manager.subscribe_team("conn-1", team(1)).await;
    manager
        .send_to_team(team(1), Message::Text("replaced".into()))
        .await;
    let msg = rx_new.recv().await.expect("new rx should receive message");
    assert!(matches!(&msg, Message::Text(t) if *t == "replaced"));
}

#[tokio::test]
async fn user_of_reports_the_authenticated_user() {
    let manager = WsManager::new();

    let _rx = manager.add("tab-a".to_string(), user(42)).await;

    assert_eq!(manager.user_of("tab-a").await, Some(user(42)));
    assert_eq!(manager.user_of("ghost").await, None);

    manager.remove("tab-a").await;
    assert_eq!(manager.user_of("tab-a").await, None);
}

// ---------------------------------------------------------------------------
// Test: team subscriptions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_to_team_reaches_only_subscribers() {
    let manager = WsManager::new();

    let mut rx1 = manager.add("conn-1".to_string(), user(1)).await;
    let mut rx2 = manager.add("conn-2".to_string(), user(2)).await;
    assert!(manager.subscribe_team("conn-1", team(1)).await);
    assert!(manager.subscribe_team("conn-2", team(2)).await);

    let sent = manager
        .send_to_team(team(1), Message::Text("team one".into()))
        .await;

    assert_eq!(sent, 1);
    let msg = rx1.recv().await.expect("subscriber should receive");
    assert!(matches!(&msg, Message::Text(t) if *t == "team one"));
    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn send_to_team_counts_only_delivered_frames() {
    let manager = WsManager::new();

    let closed = manager.add("conn-1".to_string(), user(1)).await;
    let mut open = manager.add("conn-2".to_string(), user(2)).await;
    manager.subscribe_team("conn-1", team(1)).await;
    manager.subscribe_team("conn-2", team(1)).await;
    drop(closed);

    let sent = manager
        .send_to_team(team(1), Message::Text("still alive".into()))
        .await;

    assert_eq!(sent, 1);
    assert!(matches!(open.recv().await, Some(Message::Text(t)) if t == "still alive"));
}

#[tokio::test]
async fn send_to_team_with_only_closed_receivers_counts_zero() {
    let manager = WsManager::new();

    let rx = manager.add("conn-1".to_string(), user(1)).await;
    manager.subscribe_team("conn-1", team(1)).await;
    drop(rx);

    let sent = manager
        .send_to_team(team(1), Message::Text("nobody".into()))
        .await;

    assert_eq!(sent, 0);
}

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let manager = WsManager::new();

    let mut rx = manager.add("conn-1".to_string(), user(1)).await;
    manager.subscribe_team("conn-1", team(1)).await;
    assert!(manager.unsubscribe_team("conn-1", team(1)).await);

    let sent = manager
        .send_to_team(team(1), Message::Text("gone".into()))
        .await;

    assert_eq!(sent, 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn subscribing_unknown_connection_is_refused() {
    let manager = WsManager::new();

    assert!(!manager.subscribe_team("ghost", team(1)).await);
    assert!(!manager.unsubscribe_team("ghost", team(1)).await);
}

#[tokio::test]
async fn one_connection_may_follow_several_teams() {
    let manager = WsManager::new();

    let mut rx = manager.add("conn-1".to_string(), user(1)).await;
    manager.subscribe_team("conn-1", team(1)).await;
    manager.subscribe_team("conn-1", team(2)).await;

    manager.send_to_team(team(1), Message::Text("a".into())).await;
    manager.send_to_team(team(2), Message::Text("b".into())).await;
    manager.send_to_team(team(3), Message::Text("c".into())).await;

    assert!(matches!(rx.recv().await, Some(Message::Text(t)) if t == "a"));
    assert!(matches!(rx.recv().await, Some(Message::Text(t)) if t == "b"));
    assert!(rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: shutdown and heartbeat
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();

    let mut rx1 = manager.add("conn-1".to_string(), user(1)).await;
    let mut rx2 = manager.add("conn-2".to_string(), user(2)).await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert!(matches!(rx1.recv().await, Some(Message::Close(None))));
    assert!(matches!(rx2.recv().await, Some(Message::Close(None))));
    assert!(
        rx1.recv().await.is_none(),
        "Channel should be closed after shutdown"
    );
}

#[tokio::test]
async fn ping_all_sends_ping_frames() {
    let manager = WsManager::new();

    let mut rx = manager.add("conn-1".to_string(), user(1)).await;
    manager.ping_all().await;

    assert!(matches!(rx.recv().await, Some(Message::Ping(_))));
}
