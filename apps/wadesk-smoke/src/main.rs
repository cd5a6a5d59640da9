//! Headless smoke run for the session core.
//!
//! Drives a scripted in-memory backend through startup check, QR pairing,
//! chat/message loading and session loss, printing a JSON view snapshot
//! after each stage.

mod config;
mod logging;

use chrono::{Duration, Local};
use session_core::{
    BackendClient, BridgeChannels, BridgeEvent, InMemoryBackend, MessageKind, RemoteChat,
    RemoteMessage, Session, SessionConfig, timefmt,
};
use tracing::info;

use crate::config::SmokeConfig;

#[tokio::main]
async fn main() {
    logging::init();

    let config = match SmokeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    let bridge = BridgeChannels::new(config.event_buffer);
    let mut session = Session::new(
        demo_backend(),
        SessionConfig {
            message_fetch_limit: config.message_fetch_limit,
        },
    );

    session.check_existing_connection().await;
    info!(phase = ?session.connection().phase(), "startup check complete");

    session.link_with_qr().await;

    let events = bridge.subscribe();
    bridge.emit(BridgeEvent::QrIssued {
        payload: "data:image/png;base64,SMOKE-QR".to_owned(),
    });
    bridge.emit(BridgeEvent::SessionEstablished {
        info: "device paired successfully".to_owned(),
    });
    drop(bridge);
    session.run(events).await;
    print_snapshot("after pairing", &session);

    session.select_chat(1).await;
    session.set_draft("hello from the smoke run");
    session.send_message("hello from the smoke run");
    print_snapshot("after send", &session);

    session
        .handle_event(BridgeEvent::SessionLost {
            info: "bridge shut down".to_owned(),
        })
        .await;
    print_snapshot("after session loss", &session);
}

fn print_snapshot(stage: &str, session: &Session<impl BackendClient>) {
    let view = session.view();
    let chats = session.chats();
    let snapshot = serde_json::json!({
        "stage": stage,
        "phase": session.connection().phase(),
        "linked": session.connection().linked(),
        "qr_payload": session.connection().qr_payload(),
        "last_error": session.last_error(),
        "total_unread": view.total_unread(chats),
        "chats": view.filtered_chats(chats),
        "active_chat": view.active_chat(chats),
        "active_messages": view.active_messages(chats),
    });
    match serde_json::to_string_pretty(&snapshot) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to render snapshot: {err}"),
    }
}

fn demo_backend() -> InMemoryBackend {
    let now = Local::now().naive_local();
    InMemoryBackend::default()
        .with_qr_pairing()
        .with_chats(vec![
            RemoteChat {
                remote_id: "alice@s.whatsapp.net".to_owned(),
                name: "Alice".to_owned(),
                last_preview: "see you soon".to_owned(),
                last_time: timefmt::last_activity_label(now - Duration::hours(2), now),
                unread: 2,
                is_group: false,
            },
            RemoteChat {
                remote_id: "team@g.us".to_owned(),
                name: "Weekend Plans".to_owned(),
                last_preview: "who brings snacks?".to_owned(),
                last_time: timefmt::last_activity_label(now - Duration::days(1), now),
                unread: 0,
                is_group: true,
            },
        ])
        .with_messages(
            "alice@s.whatsapp.net",
            vec![
                RemoteMessage {
                    author: "Alice".to_owned(),
                    text: "are we still on for tonight?".to_owned(),
                    time: timefmt::compose_time(now - Duration::minutes(30)),
                    mine: false,
                    kind: MessageKind::Text,
                },
                RemoteMessage {
                    author: "Me".to_owned(),
                    text: "see you soon".to_owned(),
                    time: timefmt::compose_time(now - Duration::minutes(5)),
                    mine: true,
                    kind: MessageKind::Text,
                },
            ],
        )
}
