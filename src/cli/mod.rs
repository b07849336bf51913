//! Command-line interface for tasktriage.
//!
//! Provides commands for serving the HTTP endpoint, analyzing a single
//! task from the terminal, and inspecting the resolved configuration.

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::{Parser, Subcommand};

use crate::adapters::{MailClient, OpenAiClient};
use crate::config::Config;
use crate::core::{formatter, RequestOrchestrator};
use crate::domain::TaskRequest;
use crate::server::{self, AppState};

/// tasktriage - Voice-to-task triage service
#[derive(Parser, Debug)]
#[command(name = "tasktriage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind to (overrides config)
        #[arg(short, long, env = "TASKTRIAGE_BIND")]
        bind: Option<String>,
    },

    /// Analyze a single task and print the notification
    Analyze {
        /// Task text (reads from stdin if neither text nor audio given)
        text: Option<String>,

        /// Audio file to transcribe instead of text
        #[arg(short, long)]
        audio: Option<PathBuf>,

        /// Also dispatch the notification to this address
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the parsed command
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Commands::Serve { bind } => execute_serve(config, bind).await,
            Commands::Analyze { text, audio, email } => {
                execute_analyze(config, text, audio, email).await
            }
            Commands::Config => execute_config(config),
        }
    }
}

/// Build the orchestrator from resolved configuration.
///
/// The OpenAI client serves as both transcriber and generator; all
/// collaborator handles are created here, once, and shared from then on.
fn build_orchestrator(config: &Config) -> Result<RequestOrchestrator> {
    let openai = Arc::new(OpenAiClient::new(config.openai.clone())?);
    let mailer = Arc::new(MailClient::new(config.mail.clone())?);

    Ok(RequestOrchestrator::new(
        openai.clone(),
        openai,
        mailer,
        config.profile,
        config.temperature,
    ))
}

async fn execute_serve(config: Config, bind: Option<String>) -> Result<()> {
    let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());

    let state = AppState {
        orchestrator: build_orchestrator(&config)?,
        expose_error_chain: config.expose_error_chain,
    };

    server::run(state, &bind_addr).await
}

async fn execute_analyze(
    config: Config,
    text: Option<String>,
    audio: Option<PathBuf>,
    email: Option<String>,
) -> Result<()> {
    let request = match audio {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read audio file: {}", path.display()))?;
            TaskRequest {
                audio_base64: Some(BASE64.encode(&bytes)),
                text,
                user_email: email,
            }
        }
        None => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    io::stdin()
                        .read_to_string(&mut buffer)
                        .context("Failed to read task text from stdin")?;
                    buffer.trim().to_string()
                }
            };
            TaskRequest {
                audio_base64: None,
                text: Some(text),
                user_email: email,
            }
        }
    };

    let orchestrator = build_orchestrator(&config)?;
    let outcome = orchestrator.handle(&request).await?;

    let notification = formatter::render(&outcome.analysis, &outcome.input.text);

    println!();
    println!("{}", notification.subject);
    println!("══════════════════════════════════════════════════════════════");
    println!();
    println!("{}", notification.body);

    if outcome.dispatched {
        println!("Notification dispatched.");
    }

    Ok(())
}

fn execute_config(config: Config) -> Result<()> {
    println!();
    println!("Resolved configuration");
    println!("══════════════════════════════════════════════════════════════");
    println!();
    match &config.config_file {
        Some(path) => println!("Config file:   {}", path.display()),
        None => println!("Config file:   (none found)"),
    }
    println!("Bind address:  {}", config.bind_addr);
    println!("Profile:       {:?}", config.profile);
    println!("Temperature:   {}", config.temperature);
    println!("Expose errors: {}", config.expose_error_chain);
    println!();
    println!("Generation endpoint:  {}", config.openai.endpoint);
    println!("Generation model:     {}", config.openai.model);
    println!("Transcription model:  {}", config.openai.transcription_model);
    println!(
        "OpenAI API key:       {}",
        if config.openai.api_key.is_some() { "set" } else { "not set" }
    );
    println!();
    println!("Mail API:      {}", config.mail.api_url);
    println!("Mail sender:   {}", config.mail.from);
    println!(
        "Mail API key:  {}",
        if config.mail.api_key.is_some() { "set" } else { "not set" }
    );
    println!();

    Ok(())
}
