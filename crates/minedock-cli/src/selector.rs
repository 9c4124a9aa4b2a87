//! Interactive server selector for CLI commands

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Select};
use minedock_client::Container;
use std::io::IsTerminal;

use crate::commands::status_symbol;

/// Which servers the selector offers
#[derive(Debug, Clone, Copy)]
pub enum SelectionContext {
    /// Not running (for start)
    Startable,
    /// Running (for stop)
    Running,
    /// Everything (for logs)
    Any,
}

impl SelectionContext {
    pub fn filter<'a>(&self, containers: &'a [Container]) -> Vec<&'a Container> {
        containers.iter().filter(|c| self.matches(c)).collect()
    }

    fn matches(&self, container: &Container) -> bool {
        match self {
            SelectionContext::Startable => !container.state.is_running(),
            SelectionContext::Running => container.state.is_running(),
            SelectionContext::Any => true,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            SelectionContext::Startable => "stopped",
            SelectionContext::Running => "running",
            SelectionContext::Any => "",
        }
    }
}

/// Interactively pick a server, returning its ID
pub fn select_container(
    containers: &[Container],
    context: SelectionContext,
    prompt: &str,
) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        bail!("Cannot show interactive selector: not a TTY. Specify the server as an argument.");
    }

    let filtered = context.filter(containers);
    if filtered.is_empty() {
        let kind = match context.description() {
            "" => String::from("No servers"),
            d => format!("No {} servers", d),
        };
        bail!("{} found. Use 'minedock list' to see all servers.", kind);
    }

    let items: Vec<String> = filtered
        .iter()
        .map(|c| format!("{} {}  ({})", status_symbol(&c.state), c.name, c.id.short()))
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt()?;

    match selection {
        Some(index) => Ok(filtered[index].id.to_string()),
        None => bail!("Selection cancelled"),
    }
}
