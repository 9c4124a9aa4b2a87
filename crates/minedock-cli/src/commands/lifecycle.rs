//! Server lifecycle commands: start, stop, create

use super::{find_container, format_table};
use anyhow::{bail, Result};
use minedock_client::{Action, Container};
use minedock_core::{ControlPanel, CreateForm, DispatchOutcome, SubmitOutcome};

/// Start a server
pub async fn start(panel: &ControlPanel, container: &str) -> Result<()> {
    let target = find_container(panel, container).await?;

    if target.state.is_running() {
        println!("Server '{}' is already running", target.name);
        return Ok(());
    }

    println!("Starting '{}'...", target.name);
    send(panel, &target, Action::Start).await
}

/// Stop a server
pub async fn stop(panel: &ControlPanel, container: &str) -> Result<()> {
    let target = find_container(panel, container).await?;

    if !target.state.is_running() {
        println!("Server '{}' is not running", target.name);
        return Ok(());
    }

    println!("Stopping '{}'...", target.name);
    send(panel, &target, Action::Stop).await
}

async fn send(panel: &ControlPanel, target: &Container, action: Action) -> Result<()> {
    match panel.dispatcher().dispatch(&target.id, action).await {
        DispatchOutcome::Sent { refresh } => {
            println!("Sent {} to '{}', waiting for the backend...", action, target.name);
            refresh.await?;
            print_snapshot(panel);
            Ok(())
        }
        DispatchOutcome::Rejected(error) => bail!("Backend refused to {} '{}': {}", action, target.name, error),
        DispatchOutcome::Failed(error) => bail!("Request failed: {}", error),
    }
}

/// Create a server from command-line arguments
pub async fn create(panel: &ControlPanel, form: CreateForm) -> Result<()> {
    println!("Creating '{}'...", form.name.trim());

    match panel.creator().submit(&form).await {
        SubmitOutcome::Created { refresh } => {
            println!("Created '{}'", form.name.trim());
            refresh.await?;
            print_snapshot(panel);
            Ok(())
        }
        SubmitOutcome::Invalid(reason) => bail!("{}", reason),
        SubmitOutcome::Busy => bail!("Another create request is still running"),
        SubmitOutcome::Rejected(error) => bail!("Backend refused to create the server: {}", error),
        SubmitOutcome::Failed(error) => bail!("Request failed: {}", error),
    }
}

fn print_snapshot(panel: &ControlPanel) {
    // A failed re-sync already reported itself through the notice channel
    if panel.registry().has_loaded() {
        println!();
        print!("{}", format_table(&panel.registry().snapshot()));
    }
}
