//! `stagecrew graph` — print or save the team workflow diagram.

use stagecrew_pipeline::render_mermaid;
use std::path::{Path, PathBuf};

use super::{build_team, load_config};

pub async fn run(
    config_path: Option<&Path>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let pipeline = build_team(&config, None)?;
    let diagram = render_mermaid(&pipeline);

    match output {
        Some(path) => {
            std::fs::write(&path, &diagram)
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            eprintln!("  Workflow diagram saved to {}", path.display());
            eprintln!("  Render it with any Mermaid viewer (e.g. mermaid.live).");
        }
        None => print!("{diagram}"),
    }

    Ok(())
}
