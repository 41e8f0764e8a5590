use std::io::{self, BufRead};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::Cli;
use ytsum::pipeline::{self, Outcome, PipelineError};
use ytsum::summarize::{self, SummarizeConfig, Summarizer};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = if std::env::var("GROQ_API_KEY").is_ok() {
        "  \x1b[32m✅\x1b[0m GROQ_API_KEY is set".to_string()
    } else {
        "  \x1b[31m❌\x1b[0m GROQ_API_KEY (not set — required for summarization)".to_string()
    };

    let log_path = log_dir().join("ytsum.log");

    format!(
        "\nENVIRONMENT:\n{key_line}\n\nLogs are written to: {}",
        log_path.display()
    )
}

fn resolve_api_key(config: &ytsum::config::Config) -> Result<String> {
    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        return Ok(key);
    }
    if let Some(ref key) = config.groq_api_key {
        return Ok(key.clone());
    }
    bail!(
        "GROQ_API_KEY environment variable not set (required for summarization; \
         alternatively set groq_api_key in {})",
        ytsum::config::config_path().display()
    );
}

fn display(outcome: &Outcome) {
    if !outcome.transcript.title.is_empty() {
        info!(
            "Displaying results for \"{}\" ({})",
            outcome.transcript.title, outcome.transcript.video_id
        );
    }

    println!("--- Transcript ---\n{}", outcome.transcript.joined_text());

    if let Some(ref summary) = outcome.summary {
        println!("\n--- Summary ---\n{summary}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytsum::config::Config::load().unwrap_or_default();

    // CLI flags take priority over config defaults
    let lang = cli
        .lang
        .clone()
        .or_else(|| config.default_lang.clone())
        .unwrap_or_else(|| "en".to_string());
    let model = cli
        .model
        .clone()
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| summarize::DEFAULT_MODEL.to_string());

    if cli.verbose {
        let config_path = ytsum::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Language: {lang}\nModel: {model}");
    }

    let client = reqwest::Client::new();

    // The credential is resolved once, before any action runs
    let summarizer = if cli.transcript_only {
        None
    } else {
        let api_key = resolve_api_key(&config)?;
        let summarize_config = SummarizeConfig {
            api_key,
            base_url: summarize::DEFAULT_BASE_URL.to_string(),
            model,
        };
        Some(Summarizer::new(client.clone(), summarize_config))
    };

    if let Some(ref url) = cli.url {
        let outcome = pipeline::run(&client, summarizer.as_ref(), url, &lang).await?;
        display(&outcome);
        return Ok(());
    }

    // Interactive mode: every stdin line is one summarize action; a
    // failed action prints a banner and the loop keeps going.
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        debug!("Action triggered for input: {line:?}");
        match pipeline::run(&client, summarizer.as_ref(), &line, &lang).await {
            Ok(outcome) => display(&outcome),
            Err(e @ (PipelineError::EmptyInput | PipelineError::InvalidUrl(_))) => {
                eprintln!("Warning: {e}");
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}
