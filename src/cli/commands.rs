//! Command dispatch for the legendtoc CLI

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::CheckOutcome;
use crate::cli::args::{CheckArgs, Cli, Commands, ConfigCommands, SourceArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{toggle, LayerNode, ToggleOutcome, VisibilitySet};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::TerminalAnchor;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Menu { source }) => cmd_menu(cli, source),
        Some(Commands::Toggle {
            source,
            service,
            layer,
            state,
            tree,
        }) => cmd_toggle(cli, source, service, *layer, *state, *tree),
        Some(Commands::Show {
            source,
            service,
            state,
        }) => cmd_show(cli, source, service, *state),
        Some(Commands::Engine {
            id,
            layer_id,
            parent,
            sub,
            visible,
            state,
        }) => cmd_engine(*id, *layer_id, *parent, sub, visible, *state),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "legendtoc", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

/// Layered settings with map/legend paths anchored at the project dir, CLI flags last.
fn load_settings(cli: &Cli, source: &SourceArgs) -> CliResult<Settings> {
    let project = project_dir(cli)?;
    let mut settings = Settings::load(Some(&project))?;
    settings.resolve_paths(&project);
    if let Some(map) = &source.map {
        settings.map_file = map.clone();
    }
    if let Some(legends) = &source.legends {
        settings.legend_dir = legends.clone();
    }
    debug!(
        "map_file={} legend_dir={}",
        settings.map_file.display(),
        settings.legend_dir.display()
    );
    Ok(settings)
}

fn report_toggle(outcome: &ToggleOutcome) {
    output::visibility_change(&outcome.added, &outcome.removed, &outcome.published());
}

#[instrument(skip(cli))]
fn cmd_menu(cli: &Cli, source: &SourceArgs) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli, source)?);
    let toc = container.toc_service()?;
    toc.attach(&TerminalAnchor)?;
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_toggle(
    cli: &Cli,
    source: &SourceArgs,
    service: &str,
    layer: i64,
    state: CheckArgs,
    tree: bool,
) -> CliResult<()> {
    if layer < 0 {
        return Err(CliError::InvalidArgs(format!(
            "layer id must not be negative: {}",
            layer
        )));
    }
    let container = ServiceContainer::new(load_settings(cli, source)?);
    let mut toc = container.toc_service()?;

    if let CheckOutcome::Layer { outcome, .. } = toc.toggle_layer(service, layer, state.checked())? {
        report_toggle(&outcome);
    }
    if tree {
        toc.attach(&TerminalAnchor)?;
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_show(cli: &Cli, source: &SourceArgs, service: &str, state: CheckArgs) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli, source)?);
    let mut toc = container.toc_service()?;

    if let CheckOutcome::Service { service, visible } = toc.toggle_service(service, state.checked())? {
        let label = if visible { "shown" } else { "hidden" };
        output::success(&format!("{}: {}", service, label));
    }
    Ok(())
}

#[instrument]
fn cmd_engine(
    id: i64,
    layer_id: Option<i64>,
    parent: i64,
    sub: &[i64],
    visible: &[i64],
    state: CheckArgs,
) -> CliResult<()> {
    let mut node = LayerNode::leaf(id)
        .with_parent(parent)
        .with_sub_layers(sub.to_vec());
    if let Some(layer_id) = layer_id {
        node = node.with_layer_id(layer_id);
    }
    let current = VisibilitySet::from_published(visible);
    let outcome = toggle(&node, state.checked(), &current);
    report_toggle(&outcome);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    let project = project_dir(cli)?;
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(&project))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let local = local_config_path(&project);
            match global_config_path() {
                Some(global) => output::location("global", &global),
                None => output::warning("no global config directory on this platform"),
            }
            output::location("local", &local);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
