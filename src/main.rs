use anyhow::Result;
use clap::Parser;
use colored::*;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use ca_agent::{AgentConfig, Orchestrator};
use ca_cli::{
    display_banner, failure_message, handle_input_with_history, print_help, render_event,
};
use ca_core::config::{env_var, parse_flag};
use ca_core::{DocumentStore, LlmProvider};
use ca_gemini::GeminiClient;
use ca_rag::QdrantDocumentStore;

#[derive(Parser)]
#[command(name = "compliance-agent")]
#[command(about = "Answers questions about company policy from ingested documents", long_about = None)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Hide the per-step progress lines
    #[arg(long)]
    quiet: bool,
}

/// Application-wide settings
struct AppSettings {
    app_name: String,
    debug: bool,
}

impl AppSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            app_name: env_var("APP_NAME").unwrap_or_else(|| "ComplianceAgent".to_string()),
            debug: parse_flag(&env_var, "DEBUG", false)?,
        })
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = AppSettings::from_env()?;
    init_logging(settings.debug);

    tracing::info!(app = %settings.app_name, "Starting compliance agent");

    // One client of each kind, shared by every run
    let llm: Arc<dyn LlmProvider> = Arc::new(GeminiClient::from_env()?);
    let store: Arc<dyn DocumentStore> = Arc::new(QdrantDocumentStore::from_env()?);
    let orchestrator = Orchestrator::new(llm, store, AgentConfig::from_env()?);

    if let Some(question) = cli.question {
        if !answer(&orchestrator, &question, cli.quiet).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    display_banner(&settings.app_name);

    let mut history = Vec::new();

    loop {
        let input = handle_input_with_history(&mut history).await?;

        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("{}", "👋 Goodbye!".green());
                break;
            }
            "help" => print_help(),
            _ => {
                answer(&orchestrator, &input, cli.quiet).await;
            }
        }
    }

    Ok(())
}

/// Run one question through the workflow and print the outcome
async fn answer(orchestrator: &Orchestrator, question: &str, quiet: bool) -> bool {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if !quiet {
                println!("{}", render_event(&event).dimmed());
            }
        }
    });

    let result = orchestrator.run_with_events(None, question, Some(&tx)).await;
    drop(tx);
    let _ = printer.await;

    match result {
        Ok(state) => {
            println!("{} {}", "→".green(), state.generation());
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Agent execution failed");
            eprintln!("{} {}", "❌".red(), failure_message(&e).red());
            false
        }
    }
}
