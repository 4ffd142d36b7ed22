//! Command handlers
//!
//! Each handler takes its collaborators as parameters; the binary constructs
//! the aggregator, manager, and namespace lister per invocation and wires them
//! in.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use log::info;

use crate::cli::ListFormat;
use crate::cluster::NamespaceLister;
use crate::config;
use crate::error::{Result, SwitchError};
use crate::ui;

use super::aggregator::Aggregator;
use super::manager::Manager;

/// Switch the active context, interactively when no name is given
pub fn run_context_switch(
    aggregator: &Aggregator,
    manager: &Manager,
    name: Option<&str>,
) -> Result<()> {
    let universe = aggregator.scan()?;
    if universe.is_empty() {
        return Err(SwitchError::ConfigDir(format!(
            "no kubernetes contexts found in {}",
            aggregator.config_dir().display()
        )));
    }

    let selected = match name {
        Some(name) => {
            if !universe.contains(name) {
                return Err(SwitchError::ContextNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => {
            let choice = ui::select(
                "Choose a context:",
                universe.names().to_vec(),
                manager.current_context(),
                config::defaults::PAGE_SIZE,
            )?;
            match choice {
                Some(name) => name,
                None => {
                    info!("selection cancelled");
                    return Ok(());
                }
            }
        }
    };

    manager.switch_to_context(&universe, &selected)?;
    info!("switched to context '{}'", selected);
    Ok(())
}

/// Switch the namespace of the current context, interactively when no name is
/// given. The namespace list comes from the injected collaborator either way,
/// so a named namespace is validated against what the cluster actually has.
pub fn run_namespace_switch(
    manager: &Manager,
    lister: &dyn NamespaceLister,
    name: Option<&str>,
) -> Result<()> {
    let namespaces = lister.namespaces()?;
    if namespaces.is_empty() {
        return Err(SwitchError::Cluster(
            "the cluster reported no namespaces".to_string(),
        ));
    }

    let selected = match name {
        Some(name) => {
            if !namespaces.iter().any(|ns| ns == name) {
                return Err(SwitchError::NamespaceNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => {
            let choice = ui::select(
                "Choose a namespace:",
                namespaces,
                manager.current_namespace(),
                config::defaults::PAGE_SIZE,
            )?;
            match choice {
                Some(name) => name,
                None => {
                    info!("selection cancelled");
                    return Ok(());
                }
            }
        }
    };

    manager.switch_to_namespace(&selected)?;
    info!("switched to namespace '{}'", selected);
    Ok(())
}

/// Swap the active configuration back to the previous one
pub fn run_restore(manager: &Manager) -> Result<()> {
    manager.restore_previous()?;
    info!("switched to previous configuration");
    Ok(())
}

/// Print every context in the universe
pub fn run_list(aggregator: &Aggregator, manager: &Manager, format: ListFormat) -> Result<()> {
    let universe = aggregator.scan()?;
    let current = manager.current_context();

    match format {
        ListFormat::Plain => {
            for entry in universe.entries() {
                println!("- {} [{}]", entry.name, entry.file.display());
            }
        }
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&universe.entries()).map_err(|e| {
                SwitchError::Io {
                    context: "failed to serialize contexts".to_string(),
                    message: e.to_string(),
                }
            })?;
            println!("{}", json);
        }
        ListFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL_CONDENSED)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![Cell::new("CURRENT"), Cell::new("NAME"), Cell::new("FILE")]);

            for entry in universe.entries() {
                let is_current = current.as_deref() == Some(entry.name.as_str());
                table.add_row(vec![
                    Cell::new(if is_current { "*" } else { "" }),
                    Cell::new(&entry.name),
                    Cell::new(entry.file.display()),
                ]);
            }

            println!("{table}");
        }
    }

    Ok(())
}
