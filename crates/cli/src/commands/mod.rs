//! Subcommand implementations and the wiring they share.

pub mod config_cmd;
pub mod demo;
pub mod doctor;
pub mod graph;
pub mod progress;
pub mod run;

use stagecrew_agents::{TeamBuilder, TextGenerator};
use stagecrew_config::AppConfig;
use stagecrew_core::error::ProviderError;
use stagecrew_core::event::EventBus;
use stagecrew_pipeline::{Pipeline, PipelineError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Load config from `path` when given, else from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let result = match path {
        Some(path) => AppConfig::load_with_overrides(path),
        None => AppConfig::load(),
    };
    let config = result.map_err(|e| format!("Failed to load config: {e}"))?;
    debug!(
        path = %config_file(path).display(),
        provider = %config.default_provider,
        model = %config.active_model(),
        "Config loaded"
    );
    Ok(config)
}

pub fn config_file(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path)
}

/// Build the analysis team against the configured default provider.
pub fn build_team(
    config: &AppConfig,
    event_bus: Option<Arc<EventBus>>,
) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let router = stagecrew_providers::build_from_config(config)?;
    let provider = router.default().ok_or("No default provider configured")?;

    let generator = TextGenerator::from_config(provider, config);
    debug!(provider = %generator.provider_name(), model = %generator.model(), "Building team");
    let mut builder = TeamBuilder::new(generator).with_team_config(&config.team);
    if let Some(bus) = event_bus {
        builder = builder.with_event_bus(bus);
    }
    Ok(builder.build()?)
}

/// Print a setup hint when a run failed because the provider is unusable.
pub fn print_failure_hint(err: &PipelineError, config: &AppConfig) {
    warn!(stage = err.stage().unwrap_or_default(), error = %err, "Analysis failed");
    let Some(provider_err) = err.stage_source::<ProviderError>() else {
        return;
    };

    eprintln!();
    match provider_err {
        e if e.is_unreachable() && config.default_provider == "ollama" => {
            eprintln!("  Make sure Ollama is running:");
            eprintln!("    ollama run {}", config.active_model());
        }
        e if e.is_unreachable() => {
            eprintln!("  Could not reach provider '{}'.", config.default_provider);
            eprintln!("  Run `stagecrew doctor` to check connectivity.");
        }
        ProviderError::AuthenticationFailed(_) => {
            eprintln!("  The provider rejected the API key.");
            eprintln!("  Set STAGECREW_API_KEY or add api_key to the config file.");
        }
        ProviderError::ModelNotFound(model) => {
            eprintln!("  Model '{model}' is not available on '{}'.", config.default_provider);
        }
        _ => {}
    }
    eprintln!();
}
