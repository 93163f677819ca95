//! `stagecrew demo` — run the team over the built-in samples.

use stagecrew_agents::{SAMPLES, TeamReport};
use std::path::Path;

use super::{build_team, load_config, print_failure_hint};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let pipeline = build_team(&config, None)?;

    println!();
    println!("  Testing different kinds of text");
    println!("  ══════════════════════════════════════════════");

    for sample in SAMPLES {
        let preview: String = sample.text.chars().take(60).collect();
        println!();
        println!("  Sample:   {} (expected)", sample.label);
        println!("  Text:     {preview}...");
        println!("  ──────────────────────────────────────────────");

        let record = match pipeline.run(sample.text).await {
            Ok(record) => record,
            Err(e) => {
                print_failure_hint(&e, &config);
                return Err(e.into());
            }
        };
        let report = TeamReport::from_record(&record)?;
        let first_keywords: Vec<&str> = report.keywords.iter().take(3).map(String::as_str).collect();

        println!("  Category: {}", report.category);
        println!("  Keywords: {}...", first_keywords.join(", "));
        println!("  Summary:  {}", report.summary);
    }

    println!();
    Ok(())
}
