//! Command dispatch

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use generational_arena::Index;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::PageTree;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree {
            manifest_dir,
            values,
        }) => cmd_tree(cli, manifest_dir.as_deref(), *values),
        Some(Commands::List { manifest_dir }) => cmd_list(cli, manifest_dir.as_deref()),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "prefreg", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see 'prefreg --help'".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli, manifest_dir: Option<&Path>) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref()).map_err(InfraError::from)?;
    if let Some(dir) = manifest_dir {
        settings.manifest_dir = dir.to_path_buf();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, manifest_dir: Option<&Path>, values: bool) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli, manifest_dir)?);
    let builder = container.page_tree_builder();

    let mut tree = PageTree::new();
    let report = builder
        .create_pages(&mut tree, &container.context())
        .map_err(InfraError::from)?;

    writeln!(io::stdout().lock(), "{}", render_tree(&tree, values))
        .map_err(|e| InfraError::io("write page tree", e))?;

    for diagnostic in &report.diagnostics {
        output::warning(diagnostic);
    }
    output::detail(&format!(
        "{} pages, {} skipped",
        report.pages.len(),
        report.diagnostics.len()
    ));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_list(cli: &Cli, manifest_dir: Option<&Path>) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli, manifest_dir)?);
    let collector = container.collector();
    let records = collector.collect().map_err(InfraError::from)?;

    output::header(&format!(
        "{} contributions at {}",
        records.len(),
        collector.extension_point()
    ));
    for (order, record) in &records {
        output::info(&format!(
            "{:>6}  {:<24} {:<28} {:<28} {}",
            order,
            record.id.as_deref().unwrap_or("-"),
            record.namespace,
            record.implementation_ref.as_deref().unwrap_or("-"),
            record.category.as_deref().unwrap_or("")
        ));
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli, None)?;
            output::info(&settings.to_toml().map_err(InfraError::from)?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) if path.exists() => output::info(&path.display()),
            Some(path) => output::action("not created", &path.display()),
            None => output::warning("no config directory on this platform"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

/// Renders the tree below a synthetic `Preferences` root.
pub fn render_tree(tree: &PageTree, show_values: bool) -> Tree<String> {
    let mut root = Tree::new("Preferences".to_string());
    for &idx in tree.roots() {
        if let Some(node) = render_node(tree, idx, show_values) {
            root.push(node);
        }
    }
    root
}

fn render_node(tree: &PageTree, idx: Index, show_values: bool) -> Option<Tree<String>> {
    let node = tree.get_node(idx)?;
    let title = node.page.title().filter(|t| !t.is_empty()).unwrap_or(&node.id);
    let label = match node.page.store() {
        Some(store) => format!("{} [{}] ({})", title, node.id, store.namespace()),
        None => format!("{} [{}]", title, node.id),
    };

    let mut rendered = Tree::new(label);
    if show_values {
        if let Some(store) = node.page.store() {
            for key in store.keys() {
                let value = store.get(&key).unwrap_or_default();
                rendered.push(Tree::new(format!("{key} = {value}")));
            }
        }
    }
    for &child in &node.children {
        if let Some(child) = render_node(tree, child, show_values) {
            rendered.push(child);
        }
    }
    Some(rendered)
}
