//! Mythcraft Engine - apply edits to a sheet file.
//!
//! Usage: `mythcraft-engine <sheet.json> [name=value ...]`
//!
//! Loads a flat JSON attribute map, opens it (running migrations), applies
//! each edit as a player change and prints the resulting map.

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mythcraft_engine::infrastructure::config::DEFAULT_LOG_FILTER;
use mythcraft_engine::{
    AttributeUpdate, CharacterSheet, ChangeOrigin, DispatchReport, EngineConfig,
    InMemoryAttributeStore,
};

fn main() -> anyhow::Result<()> {
    // Load environment from repo root so `.env` works from any crate dir.
    load_dotenv_from_repo_root();

    let config = EngineConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: mythcraft-engine <sheet.json> [name=value ...]");
    };
    let edits = args
        .map(|arg| parse_edit(&arg))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let store = InMemoryAttributeStore::from_json(&raw).with_context(|| format!("parsing {path}"))?;
    tracing::info!(path = %path, attributes = store.len(), "Loaded sheet");

    let mut sheet = CharacterSheet::with_standard_rules(store, config)?;

    let outcome = sheet.open();
    if !outcome.applied.is_empty() {
        tracing::info!(from = %outcome.from, to = %outcome.to, "Sheet upgraded");
    }
    log_report("open", &outcome.report);

    for (name, value) in edits {
        let label = format!("{name}={value}");
        let report = sheet.set_attrs(AttributeUpdate::from([(name, value)]), ChangeOrigin::Player);
        log_report(&label, &report);
    }

    println!("{}", sheet.store().to_json_pretty()?);
    Ok(())
}

fn parse_edit(arg: &str) -> anyhow::Result<(String, String)> {
    let Some((name, value)) = arg.split_once('=') else {
        bail!("edit {arg:?} is not name=value");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("edit {arg:?} has no attribute name");
    }
    Ok((name.to_string(), value.to_string()))
}

fn log_report(operation: &str, report: &DispatchReport) {
    tracing::info!(
        operation,
        changes = report.changes.len(),
        "Applied sheet operation"
    );
    for diagnostic in &report.diagnostics {
        tracing::warn!(operation, rule = %diagnostic.rule, "{}", diagnostic.message);
    }
    for failure in &report.failures {
        tracing::error!(
            operation,
            rule = %failure.rule,
            subject = %failure.subject,
            error = %failure.error,
            "Sheet rule failed"
        );
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
