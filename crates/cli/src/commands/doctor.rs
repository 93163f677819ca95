//! `stagecrew doctor` — Diagnose config and provider health.

use std::path::Path;

use super::{config_file, load_config};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("stagecrew doctor — system diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let file = config_file(config_path);
    if file.exists() {
        println!("  ✅ Config file found at {}", file.display());
    } else {
        println!("  ⚠️  No config file — using defaults (`stagecrew config init` writes one)");
    }

    let config = match load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ {e}");
            return Err(e);
        }
    };

    if config.is_local_provider() || config.has_api_key() {
        println!("  ✅ Credentials OK for '{}'", config.default_provider);
    } else {
        println!("  ⚠️  No API key configured for '{}'", config.default_provider);
        issues += 1;
    }

    let router = stagecrew_providers::build_from_config(&config)?;
    let provider = router.default().ok_or("No default provider configured")?;

    match provider.health_check().await {
        Ok(true) => {
            println!("  ✅ Provider '{}' reachable", provider.name());
            match provider.list_models().await {
                Ok(models) if models.iter().any(|m| m == config.active_model()) => {
                    println!("  ✅ Model '{}' available", config.active_model());
                }
                Ok(models) if models.is_empty() => {
                    println!("  ⚠️  Provider did not list any models");
                }
                Ok(_) => {
                    println!("  ⚠️  Model '{}' not listed by provider", config.active_model());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ⚠️  Could not list models: {e}");
                }
            }
        }
        Ok(false) => {
            println!("  ❌ Provider '{}' answered with an error", provider.name());
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
            if config.default_provider == "ollama" {
                println!("     Start it with: ollama run {}", config.active_model());
            }
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
