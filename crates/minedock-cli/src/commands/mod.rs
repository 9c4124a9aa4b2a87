//! CLI command implementations

mod lifecycle;
mod manage;

use anyhow::{anyhow, Result};
use minedock_client::{Container, ContainerStatus};
use minedock_core::ControlPanel;

pub use lifecycle::*;
pub use manage::*;

/// Find a container by ID, name, or unique ID/name prefix
pub async fn find_container(panel: &ControlPanel, name_or_id: &str) -> Result<Container> {
    let containers = panel.registry().fetch().await?;
    resolve(&containers, name_or_id)
}

fn resolve(containers: &[Container], name_or_id: &str) -> Result<Container> {
    if let Some(c) = containers
        .iter()
        .find(|c| c.id.as_ref() == name_or_id || c.name == name_or_id)
    {
        return Ok(c.clone());
    }

    let matches: Vec<_> = containers
        .iter()
        .filter(|c| c.id.as_ref().starts_with(name_or_id) || c.name.starts_with(name_or_id))
        .collect();

    match matches.len() {
        0 => Err(anyhow!("Server '{}' not found", name_or_id)),
        1 => Ok(matches[0].clone()),
        _ => Err(anyhow!(
            "Ambiguous server reference '{}', matches: {}",
            name_or_id,
            matches
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

pub(crate) fn status_symbol(state: &ContainerStatus) -> &'static str {
    match state {
        ContainerStatus::Running(_) => "●",
        ContainerStatus::Stopped(_) => "○",
        ContainerStatus::Other(_) => "◔",
    }
}

/// Render the server table printed by `list` and after actions
pub fn format_table(containers: &[Container]) -> String {
    if containers.is_empty() {
        return "No servers found.\n\nUse 'minedock create --name <NAME> --port <PORT>' to add one.\n"
            .to_string();
    }

    const NAME_WIDTH: usize = 24;
    const ID_WIDTH: usize = 14;
    const IMAGE_WIDTH: usize = 28;

    let mut out = format!(
        "  {:<NAME_WIDTH$} {:<ID_WIDTH$} {:<IMAGE_WIDTH$} STATUS\n",
        "NAME", "ID", "IMAGE"
    );
    out.push_str(&"-".repeat(80));
    out.push('\n');

    for c in containers {
        let status = c.status.as_deref().unwrap_or(c.state.as_str());
        out.push_str(&format!(
            "{} {:<NAME_WIDTH$} {:<ID_WIDTH$} {:<IMAGE_WIDTH$} {}\n",
            status_symbol(&c.state),
            c.name,
            c.id.short(),
            c.image.as_deref().unwrap_or("-"),
            status
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn containers() -> Vec<Container> {
        serde_json::from_value(json!([
            {"ID": "0123456789abcdef", "Name": "survival", "State": "running", "Status": "Up 2 hours"},
            {"ID": "fedcba9876543210", "Name": "creative", "State": "exited"},
            {"ID": "0199999999999999", "Name": "creative-old", "State": "exited"},
        ]))
        .unwrap()
    }

    #[test]
    fn test_resolve_exact_and_prefix() {
        let all = containers();
        assert_eq!(resolve(&all, "survival").unwrap().name, "survival");
        assert_eq!(resolve(&all, "fedc").unwrap().name, "creative");
        // Exact name wins over a longer name sharing the prefix
        assert_eq!(resolve(&all, "creative").unwrap().name, "creative");
    }

    #[test]
    fn test_resolve_ambiguous_and_missing() {
        let all = containers();
        let err = resolve(&all, "01").unwrap_err().to_string();
        assert!(err.contains("Ambiguous"));
        assert!(err.contains("survival"));
        assert!(resolve(&all, "nether").is_err());
    }

    #[test]
    fn test_format_table() {
        let table = format_table(&containers());
        assert!(table.contains("NAME"));
        assert!(table.contains("● survival"));
        assert!(table.contains("0123456789ab "));
        assert!(table.contains("Up 2 hours"));
        assert!(table.contains("○ creative"));
        // No human status falls back to the state as the backend spelled it
        assert!(table.contains("exited"));
    }

    #[test]
    fn test_format_table_empty() {
        assert!(format_table(&[]).contains("No servers found"));
    }
}
