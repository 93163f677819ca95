//! `stagecrew run` — analyse one text.

use stagecrew_agents::TeamReport;
use stagecrew_core::event::EventBus;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{build_team, load_config, print_failure_hint, progress};

pub async fn run(
    config_path: Option<&Path>,
    text: Option<String>,
    file: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let input = read_input(text, file)?;

    let bus = Arc::new(EventBus::default());
    let printer = (!json).then(|| progress::spawn(&bus));
    let pipeline = build_team(&config, Some(bus.clone()))?;

    if !json {
        eprintln!();
        eprintln!("  Provider:  {}", config.default_provider);
        eprintln!("  Model:     {}", config.active_model());
        eprintln!("  Team:      {}", pipeline.stage_names().join(" → "));
    }

    let result = pipeline.run(input).await;

    // Closing the bus lets the printer drain and exit before the report
    drop(pipeline);
    drop(bus);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    let record = match result {
        Ok(record) => record,
        Err(e) => {
            print_failure_hint(&e, &config);
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_report(&TeamReport::from_record(&record)?);
    }

    Ok(())
}

fn read_input(
    text: Option<String>,
    file: Option<PathBuf>,
) -> Result<String, Box<dyn std::error::Error>> {
    let input = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        (None, None) => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Err("No input. Pass TEXT, --file PATH, or pipe text on stdin.".into());
            }
            let mut buf = String::new();
            stdin.read_to_string(&mut buf)?;
            buf
        }
    };

    if input.trim().is_empty() {
        return Err("Input text is empty.".into());
    }
    Ok(input)
}

fn print_report(report: &TeamReport) {
    println!();
    println!("  ══════════════════════════════════════════════");
    println!("  TEAM REPORT");
    println!("  ══════════════════════════════════════════════");
    println!("  Category:    {}", report.category);
    println!("  Keywords:    {}", report.keywords.join(", "));
    println!("  Summary:     {}", report.summary);
    println!("  Last agent:  {}", report.last_agent);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_text_wins() {
        let input = read_input(Some("hello".into()), None).unwrap();
        assert_eq!(input, "hello");
    }

    #[test]
    fn blank_text_rejected() {
        assert!(read_input(Some("   \n".into()), None).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_input(None, Some(PathBuf::from("/nonexistent/input.txt"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/input.txt"));
    }
}
