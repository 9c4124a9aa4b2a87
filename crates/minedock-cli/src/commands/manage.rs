//! Read-side commands: list, logs, config

use super::{find_container, format_table};
use anyhow::Result;
use crossterm::style::Stylize;
use minedock_config::ClientConfig;
use minedock_core::{ControlPanel, LogEntry, LogSession, LogStyle};
use std::io::{IsTerminal, Write};
use std::path::Path;

/// List servers
pub async fn list(panel: &ControlPanel) -> Result<()> {
    let containers = panel.registry().fetch().await?;
    print!("{}", format_table(&containers));
    Ok(())
}

/// Follow a server's console until the stream closes or Ctrl-C
pub async fn logs(panel: &ControlPanel, container: &str) -> Result<()> {
    let target = find_container(panel, container).await?;
    let color = std::io::stdout().is_terminal();

    let mut session = panel.log_session();
    session.open(&target.id, &mut ()).await;

    let mut stdout = std::io::stdout();
    follow(&mut session, &mut stdout, color).await
}

/// Write every entry of `session` to `out` as it arrives.
///
/// Returns once the session is no longer live. Ctrl-C closes the session,
/// which still prints the disconnect marker.
pub async fn follow<W: Write>(session: &mut LogSession, out: &mut W, color: bool) -> Result<()> {
    // Whatever `open` already produced, e.g. the marker of a failed connect
    for entry in session.entries() {
        write_entry(out, entry, color)?;
    }

    while session.state().is_live() {
        out.flush()?;
        tokio::select! {
            event = session.next_event() => {
                if let Some(entry) = session.apply(event, &mut ()) {
                    write_entry(out, entry, color)?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Interrupted, closing console");
                session.close(&mut ());
                if let Some(entry) = session.entries().back() {
                    write_entry(out, entry, color)?;
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn write_entry<W: Write>(out: &mut W, entry: &LogEntry, color: bool) -> std::io::Result<()> {
    let text = entry.text.trim_end_matches(['\r', '\n']);
    if !color {
        return writeln!(out, "{}", text);
    }

    match entry.style {
        LogStyle::Success => writeln!(out, "{}", text.green()),
        LogStyle::Info => writeln!(out, "{}", text.cyan()),
        LogStyle::Neutral => writeln!(out, "{}", text),
        LogStyle::Warning => writeln!(out, "{}", text.yellow()),
        LogStyle::Error => writeln!(out, "{}", text.red()),
    }
}

/// Show the effective configuration, or write it out with `init`
pub fn config(config: &ClientConfig, path: &Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            println!("Config already exists at {:?}", path);
        } else {
            config.save_to(path)?;
            println!("Created config at {:?}", path);
        }
        return Ok(());
    }

    if path.exists() {
        println!("# Config file: {:?}\n", path);
    } else {
        println!("# Config file: {:?} (not created yet)\n", path);
    }
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
