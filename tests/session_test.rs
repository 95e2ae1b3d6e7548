use std::time::Duration;

use mafia_server::{
    models::{
        event::{ClientEvent, ServerEvent},
        game::Stage,
    },
    services::{
        game_service::GameController,
        session_service::{spawn_game, GameHandle, Outbound},
        word_service::SecretWords,
    },
    utils::test_setup::setup_test_env,
};
use tokio::sync::mpsc;

const REVEAL_DELAY: Duration = Duration::from_secs(6);

fn spawn() -> GameHandle {
    setup_test_env();
    spawn_game(
        GameController::with_seed(SecretWords::builtin(), 7),
        REVEAL_DELAY,
    )
}

fn join(handle: &GameHandle, id: &str) -> mpsc::UnboundedReceiver<Outbound> {
    let (tx, rx) = mpsc::unbounded_channel();
    handle.connect(id.to_string(), tx).unwrap();
    rx
}

fn drain(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> Vec<Outbound> {
    let mut out = Vec::new();
    while let Ok(item) = rx.try_recv() {
        out.push(item);
    }
    out
}

#[tokio::test(start_paused = true)]
async fn test_reveal_fires_after_delay() {
    let handle = spawn();
    let mut sockets: Vec<_> = (0..5).map(|i| join(&handle, &format!("conn-{}", i))).collect();

    assert_eq!(handle.snapshot().await.unwrap().stage, Stage::Beginning);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.snapshot().await.unwrap().stage, Stage::Beginning);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(handle.snapshot().await.unwrap().stage, Stage::Day);

    let mut mafia_count = 0;
    let mut citizen_count = 0;
    for rx in sockets.iter_mut() {
        let received = drain(rx);
        if received.contains(&Outbound::Event(ServerEvent::MafiaCode)) {
            mafia_count += 1;
        }
        if received
            .iter()
            .any(|o| matches!(o, Outbound::Event(ServerEvent::SecretCode(_))))
        {
            citizen_count += 1;
        }
        assert_eq!(
            received.last(),
            Some(&Outbound::Event(ServerEvent::StageChanged(Stage::Day)))
        );
    }
    assert_eq!(mafia_count, 1);
    assert_eq!(citizen_count, 4);
}

#[tokio::test(start_paused = true)]
async fn test_reveal_is_dropped_after_reset() {
    let handle = spawn();
    let _sockets: Vec<_> = (0..5).map(|i| join(&handle, &format!("conn-{}", i))).collect();
    assert_eq!(handle.snapshot().await.unwrap().stage, Stage::Beginning);

    for i in 0..5 {
        handle.disconnect(format!("conn-{}", i)).unwrap();
    }
    assert_eq!(handle.snapshot().await.unwrap().stage, Stage::Pending);

    tokio::time::sleep(REVEAL_DELAY * 2).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.stage, Stage::Pending);
    assert!(snapshot.roster.is_empty());
}

#[tokio::test]
async fn test_rejected_socket_is_closed_on_request() {
    let handle = spawn();
    let _sockets: Vec<_> = (0..5).map(|i| join(&handle, &format!("conn-{}", i))).collect();

    let mut extra = join(&handle, "conn-5");
    handle
        .send_event("conn-5".to_string(), ClientEvent::ForceDisconnected)
        .unwrap();

    assert_eq!(
        extra.recv().await,
        Some(Outbound::Event(ServerEvent::FullRoom))
    );
    // the sink is dropped right after the close request
    let mut rest = Vec::new();
    while let Some(item) = extra.recv().await {
        rest.push(item);
    }
    assert_eq!(rest.last(), Some(&Outbound::Close));

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.roster.len(), 5);
}

#[tokio::test]
async fn test_chat_log_query() {
    let handle = spawn();
    let mut rx = join(&handle, "conn-0");
    handle
        .send_event(
            "conn-0".to_string(),
            ClientEvent::ChatMessage("hello".to_string()),
        )
        .unwrap();

    let log = handle.chat_log().await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].content, "hello");

    let received = drain(&mut rx);
    assert!(received
        .iter()
        .any(|o| matches!(o, Outbound::Event(ServerEvent::ChatMessage { text, .. }) if text == "hello")));
}
