use anyhow::{Context as AnyhowContext, Result};
use errlens_insight::{
    CompletionService, GeminiClient, GeminiConfig, OfflineCompletion, DEFAULT_GEMINI_BASE_URL,
    DEFAULT_GEMINI_MODEL,
};
use std::env;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub(crate) const AI_MODE_ENV: &str = "ERRLENS_AI_MODE";
pub(crate) const MODEL_ENV: &str = "ERRLENS_GEMINI_MODEL";
pub(crate) const BASE_URL_ENV: &str = "ERRLENS_GEMINI_BASE_URL";
pub(crate) const TIMEOUT_ENV: &str = "ERRLENS_AI_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum AiMode {
    Gemini,
    Offline,
}

impl AiMode {
    fn parse(raw: Option<&str>) -> Result<Self> {
        let raw = raw.map(|v| v.trim().to_ascii_lowercase()).unwrap_or_default();
        match raw.as_str() {
            "" | "gemini" => Ok(Self::Gemini),
            "offline" => Ok(Self::Offline),
            other => anyhow::bail!(
                "Unsupported {AI_MODE_ENV} '{other}' (expected 'gemini' or 'offline')"
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct AiConfig {
    pub(crate) mode: AiMode,
    pub(crate) gemini: Option<GeminiConfig>,
}

impl AiConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mode = AiMode::parse(lookup(AI_MODE_ENV).as_deref())?;
        if mode == AiMode::Offline {
            return Ok(Self { mode, gemini: None });
        }

        let api_key = lookup(API_KEY_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .with_context(|| {
                format!("{API_KEY_ENV} environment variable not set (or set {AI_MODE_ENV}=offline)")
            })?;

        let timeout_secs = match lookup(TIMEOUT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid {TIMEOUT_ENV} '{raw}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let mut gemini = GeminiConfig::new(api_key);
        gemini.model =
            non_empty(lookup(MODEL_ENV)).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        gemini.base_url =
            non_empty(lookup(BASE_URL_ENV)).unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        gemini.timeout = Duration::from_secs(timeout_secs);

        Ok(Self {
            mode,
            gemini: Some(gemini),
        })
    }

    pub(crate) fn completion_service(&self) -> Result<Arc<dyn CompletionService>> {
        match (&self.mode, &self.gemini) {
            (AiMode::Gemini, Some(config)) => {
                let client = GeminiClient::new(config.clone())
                    .context("Failed to configure Gemini client")?;
                log::info!("AI completion: gemini (model {})", client.model());
                Ok(Arc::new(client))
            }
            (AiMode::Gemini, None) => anyhow::bail!("Gemini mode requires {API_KEY_ENV}"),
            (AiMode::Offline, _) => {
                log::info!("AI completion: offline (fallback content only)");
                Ok(Arc::new(OfflineCompletion))
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
