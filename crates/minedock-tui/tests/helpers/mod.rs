use crossterm::event::{KeyCode, KeyModifiers};
use minedock_client::{paths, Method};
use minedock_core::test_support::{mock_container, MockTransport};
use minedock_tui::App;
use ratatui::{backend::TestBackend, Terminal};
use serde_json::json;

/// Render the app to a TestBackend and capture output as a string
#[allow(dead_code)]
pub fn render_app(app: &mut App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| minedock_tui::ui::draw(frame, app))
        .unwrap();
    let buffer = terminal.backend().buffer().clone();
    buffer_to_string(&buffer)
}

/// Convert a ratatui buffer to a string representation
#[allow(dead_code)]
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let mut output = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            output.push_str(buffer.get(x, y).symbol());
        }
        output.push('\n');
    }
    output
}

#[allow(dead_code)]
pub async fn press(app: &mut App, code: KeyCode) {
    app.send_key(code, KeyModifiers::NONE).await.unwrap();
}

#[allow(dead_code)]
pub async fn ctrl(app: &mut App, c: char) {
    app.send_key(KeyCode::Char(c), KeyModifiers::CONTROL)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        press(app, KeyCode::Char(c)).await;
    }
}

#[allow(dead_code)]
pub async fn tick(app: &mut App) {
    app.send_tick().await.unwrap();
}

/// An app whose registry already holds three servers
#[allow(dead_code)]
pub async fn app_with_servers() -> (App, MockTransport) {
    let (mut app, mock) = App::new_for_testing();
    mock.reply_always(
        Method::Get,
        paths::CONTAINERS,
        json!([
            mock_container("aaaaaaaaaaaaaaaa", "survival", "running"),
            mock_container("bbbbbbbbbbbbbbbb", "creative", "exited"),
            mock_container("cccccccccccccccc", "modded", "restarting"),
        ]),
    );
    press(&mut app, KeyCode::Char('r')).await;
    (app, mock)
}
