//! Subcommand implementations

use std::io::Read;
use std::path::Path;

use abac_policy_compiler::{
    hydrate_selection, render_sentence, AttributeCatalog, AttributeDefinition, CompileOptions,
    Directory, PolicyCompiler, PolicyDocument, RuleIdScheme, SelectionState,
};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::{Commands, ContextArgs, RuleIds, SchemaKind};

/// Run a subcommand and return what should be printed on stdout
pub(crate) fn run(command: Commands) -> Result<String> {
    match command {
        Commands::Compile {
            selection,
            context,
            rule_ids,
            default_description,
            pretty,
        } => {
            let selection = load_selection(&selection)?;
            let (catalog, directory) = load_context(&context)?;
            let rule_ids = match rule_ids {
                RuleIds::Timestamp => RuleIdScheme::Timestamp,
                RuleIds::Uuid => RuleIdScheme::Uuid,
            };
            let options = CompileOptions::default()
                .with_rule_ids(rule_ids)
                .with_default_description(default_description);

            let document =
                PolicyCompiler::with_options(&catalog, &directory, options).compile(&selection)?;
            to_json(&document, pretty)
        }
        Commands::Render { selection, context } => {
            let selection = load_selection(&selection)?;
            let (catalog, directory) = load_context(&context)?;
            Ok(render_sentence(&selection, &catalog, &directory))
        }
        Commands::Hydrate {
            document,
            catalog,
            pretty,
        } => {
            let text = read_input(&document)?;
            let document = PolicyDocument::from_json(&text)?;
            let catalog = load_catalog(catalog.as_deref())?;
            to_json(&hydrate_selection(&document, &catalog), pretty)
        }
        Commands::Schema { kind } => {
            let schema = match kind {
                SchemaKind::Document => schemars::schema_for!(PolicyDocument),
                SchemaKind::Selection => schemars::schema_for!(SelectionState),
                SchemaKind::Catalog => schemars::schema_for!(Vec<AttributeDefinition>),
                SchemaKind::Directory => schemars::schema_for!(Directory),
            };
            to_json(&schema, true)
        }
    }
}

/// Read a file, or stdin when the path is `-`
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_selection(path: &Path) -> Result<SelectionState> {
    let text = read_input(path)?;
    Ok(SelectionState::from_json(&text)?)
}

fn load_catalog(path: Option<&Path>) -> Result<AttributeCatalog> {
    let Some(path) = path else {
        warn!("No attribute catalog given; attribute conditions will be skipped");
        return Ok(AttributeCatalog::default());
    };
    let text = read_input(path)?;
    let catalog = AttributeCatalog::from_json(&text)
        .with_context(|| format!("Invalid attribute catalog in {}", path.display()))?;
    info!("Loaded {} attributes from {}", catalog.len(), path.display());
    Ok(catalog)
}

fn load_context(context: &ContextArgs) -> Result<(AttributeCatalog, Directory)> {
    let catalog = load_catalog(context.catalog.as_deref())?;
    let directory = match context.directory.as_deref() {
        Some(path) => {
            let text = read_input(path)?;
            Directory::from_json(&text)
                .with_context(|| format!("Invalid entity directory in {}", path.display()))?
        }
        None => Directory::default(),
    };
    Ok((catalog, directory))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}
