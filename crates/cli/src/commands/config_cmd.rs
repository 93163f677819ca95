//! `stagecrew config` — Configuration management commands.

use stagecrew_config::AppConfig;
use std::path::Path;

use super::{config_file, load_config};

pub async fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match load_config(config_path) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();
            if !config.has_api_key() && !config.is_local_provider() {
                warnings.push(format!(
                    "No API key set for '{}' (set STAGECREW_API_KEY or OPENAI_API_KEY)",
                    config.default_provider
                ));
            }
            if config.team.keyword_count > 20 {
                warnings.push("keyword_count above 20 tends to produce noisy keywords".into());
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Provider:    {}", config.default_provider);
            println!("   Model:       {}", config.active_model());
            println!("   Temperature: {}", config.default_temperature);
            println!("   Categories:  {}", config.team.categories.join(", "));
            println!("   Keywords:    {}", config.team.keyword_count);
            println!("   Summary:     {} words max", config.team.summary_max_words);
        }
        Err(e) => {
            println!("   ❌ {e}");
            return Err(e);
        }
    }

    Ok(())
}

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if config.api_key.is_some() {
        config.api_key = Some("[REDACTED]".into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some("[REDACTED]".into());
        }
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", config_file(config_path).display());
    Ok(())
}

pub async fn init(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_file(config_path);
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("✅ Wrote default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_valid() {
        let path = config_file(None);
        assert!(path.to_str().unwrap().ends_with("config.toml"));
    }

    #[test]
    fn explicit_path_is_used() {
        let path = config_file(Some(Path::new("/tmp/custom.toml")));
        assert_eq!(path, Path::new("/tmp/custom.toml"));
    }
}
