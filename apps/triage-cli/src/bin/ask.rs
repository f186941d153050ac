//! One-shot CLI query against the triage pipeline.
//!
//! Usage: `triage-ask [--skip-reasoner] "<symptom description>"`

use std::env;

use triage_core::config::TriageConfig;
use triage_pipeline::Pipeline;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let skip_reasoner = if let Some(pos) = args.iter().position(|a| a == "--skip-reasoner") {
        args.remove(pos);
        true
    } else {
        false
    };
    if args.is_empty() {
        eprintln!("Usage: triage-ask [--skip-reasoner] \"<symptom description>\"");
        std::process::exit(1);
    }
    let symptoms = args.join(" ");
    if symptoms.trim().is_empty() {
        eprintln!("symptoms required");
        std::process::exit(1);
    }

    let config = TriageConfig::load()?;
    let pipeline = Pipeline::warm_up(&config)?;

    let response = pipeline.ask(&symptoms, skip_reasoner)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
