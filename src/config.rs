//! Configuration for tasktriage.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (TASKTRIAGE_*, OPENAI_API_KEY, MAIL_API_KEY)
//! 2. Config file (.tasktriage/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .tasktriage/config.yaml
//! - Falls back to ~/.tasktriage/config.yaml
//!
//! The resolved config is loaded once at startup and passed into the
//! constructors; collaborator handles are explicit dependencies built
//! from it, not globals.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::{MailerConfig, OpenAiConfig};
use crate::domain::AnalysisProfile;

/// Default bind address for the HTTP server
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// Default sampling temperature (near-deterministic output)
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
    #[serde(default)]
    pub mail: Option<MailerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    /// Address the HTTP server binds to
    pub bind: Option<String>,
    /// Include error cause chains in 500 bodies
    pub expose_error_chain: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineSection {
    /// Which schema variant to serve
    pub profile: Option<AnalysisProfile>,
    /// Sampling temperature for the generation call
    pub temperature: Option<f32>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub profile: AnalysisProfile,
    pub temperature: f32,
    pub expose_error_chain: bool,
    pub openai: OpenAiConfig,
    pub mail: MailerConfig,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        Self::load_from(find_config_file())
    }

    /// Load configuration, reading the given config file if any
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let file = match &config_path {
            Some(path) => Some(load_config_file(path)?),
            None => None,
        };

        let mut openai = file
            .as_ref()
            .and_then(|f| f.openai.clone())
            .unwrap_or_default();
        if let Some(key) = env_var("OPENAI_API_KEY") {
            openai.api_key = Some(key);
        }
        if let Some(endpoint) = env_var("OPENAI_ENDPOINT") {
            openai.endpoint = endpoint;
        }
        if let Some(model) = env_var("OPENAI_MODEL") {
            openai.model = model;
        }

        let mut mail = file
            .as_ref()
            .and_then(|f| f.mail.clone())
            .unwrap_or_default();
        if let Some(key) = env_var("MAIL_API_KEY") {
            mail.api_key = Some(key);
        }
        if let Some(url) = env_var("MAIL_API_URL") {
            mail.api_url = url;
        }
        if let Some(from) = env_var("MAIL_FROM") {
            mail.from = from;
        }

        let bind_addr = env_var("TASKTRIAGE_BIND")
            .or_else(|| file.as_ref().and_then(|f| f.server.bind.clone()))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let profile = match env_var("TASKTRIAGE_PROFILE") {
            Some(value) => parse_profile(&value)?,
            None => file
                .as_ref()
                .and_then(|f| f.pipeline.profile)
                .unwrap_or_default(),
        };

        let temperature = match env_var("TASKTRIAGE_TEMPERATURE") {
            Some(value) => value
                .parse::<f32>()
                .with_context(|| format!("Invalid TASKTRIAGE_TEMPERATURE: {}", value))?,
            None => file
                .as_ref()
                .and_then(|f| f.pipeline.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
        };

        let expose_error_chain = match env_var("TASKTRIAGE_EXPOSE_ERRORS") {
            Some(value) => matches!(value.as_str(), "1" | "true" | "yes"),
            None => file
                .as_ref()
                .and_then(|f| f.server.expose_error_chain)
                .unwrap_or(false),
        };

        Ok(Self {
            bind_addr,
            profile,
            temperature,
            expose_error_chain,
            openai,
            mail,
            config_file: config_path,
        })
    }
}

/// Find config file by searching current directory and parents, then
/// the home directory
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(".tasktriage").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = dirs::home_dir()?.join(".tasktriage").join("config.yaml");
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_profile(value: &str) -> Result<AnalysisProfile> {
    match value.to_ascii_lowercase().as_str() {
        "basic" => Ok(AnalysisProfile::Basic),
        "extended" => Ok(AnalysisProfile::Extended),
        other => anyhow::bail!("Unknown profile '{}' (expected basic or extended)", other),
    }
}
