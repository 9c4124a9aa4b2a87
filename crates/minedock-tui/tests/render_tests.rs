//! Rendering tests against ratatui's TestBackend

mod helpers;

use crossterm::event::KeyCode;
use helpers::*;
use minedock_client::{paths, Method};
use minedock_tui::App;

#[tokio::test]
async fn test_list_shows_servers() {
    let (mut app, _mock) = app_with_servers().await;
    let screen = render_app(&mut app, 110, 20);

    assert!(screen.contains("minedock - Minecraft Server Control"));
    assert!(screen.contains("http://127.0.0.1:8080"));
    assert!(screen.contains("1/3 running"));
    assert!(screen.contains("survival"));
    assert!(screen.contains("creative"));
    assert!(screen.contains("aaaaaaaaaaaa"));
    assert!(!screen.contains("aaaaaaaaaaaaa"), "ids are shortened");
    assert!(screen.contains("itzg/minecraft-server"));
    assert!(screen.contains("Up 5 minutes"));
    assert!(screen.contains("s: Start"));
}

#[tokio::test]
async fn test_unloaded_list_hints_retry() {
    let (mut app, _mock) = App::new_for_testing();
    let screen = render_app(&mut app, 100, 16);
    assert!(screen.contains("Container list not loaded"));
}

#[tokio::test]
async fn test_empty_list_hints_create() {
    let (mut app, _mock) = App::new_for_testing();
    press(&mut app, KeyCode::Char('r')).await;
    let screen = render_app(&mut app, 100, 16);
    assert!(screen.contains("No servers yet"));
}

#[tokio::test]
async fn test_failed_refresh_shows_notice() {
    let (mut app, mock) = App::new_for_testing();
    mock.fail(Method::Get, paths::CONTAINERS);
    press(&mut app, KeyCode::Char('r')).await;
    app.drain_notices();

    let screen = render_app(&mut app, 100, 16);
    assert!(screen.contains("Failed to load container list"));
}

#[tokio::test]
async fn test_console_renders_entries() {
    let (mut app, mock) = app_with_servers().await;
    press(&mut app, KeyCode::Char('l')).await;
    let feed = mock.take_feed().unwrap();
    feed.open();
    feed.message(r#"{"type":"info","content":"[Server thread/INFO]: Starting minecraft server"}"#);
    feed.message(r#"{"type":"error","content":"attach failed"}"#);
    for _ in 0..3 {
        let event = app.session.next_event().await;
        app.apply_stream_event(event);
    }

    let screen = render_app(&mut app, 100, 16);
    assert!(screen.contains("Console: survival [live]"));
    assert!(screen.contains(">>> connected <<<"));
    assert!(screen.contains("Starting minecraft server"));
    assert!(screen.contains("attach failed"));
    assert!(screen.contains("Esc/q: Close"));
}

#[tokio::test]
async fn test_create_dialog_renders_fields() {
    let (mut app, _mock) = App::new_for_testing();
    press(&mut app, KeyCode::Char('n')).await;
    type_str(&mut app, "lobby").await;
    ctrl(&mut app, 'a').await;
    type_str(&mut app, "DIFFICULTY").await;

    let screen = render_app(&mut app, 100, 30);
    assert!(screen.contains("New Server"));
    assert!(screen.contains("lobby"));
    assert!(screen.contains("Data path"));
    assert!(screen.contains("Environment"));
    assert!(screen.contains("DIFFICULTY"));
    assert!(screen.contains("Ctrl-a: Add env"));
}

#[tokio::test]
async fn test_help_popup() {
    let (mut app, _mock) = App::new_for_testing();
    press(&mut app, KeyCode::Char('?')).await;
    let screen = render_app(&mut app, 100, 34);
    assert!(screen.contains("Open live console"));
    assert!(screen.contains("Press any key to close"));
}
