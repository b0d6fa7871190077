use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use fact_check::{Credential, SourceKind, VerifierConfig};

/// Build the verifier configuration from environment variables.
///
/// Keyed providers are enabled only when their key is set.
pub fn load() -> Result<VerifierConfig> {
    // Load .env file if present (development)
    let _ = dotenv();

    let mut config = VerifierConfig::default();

    config.sources.encyclopedia.enabled = flag("WIKIPEDIA_ENABLED", true)?;
    config.sources.statistics.enabled = flag("WORLD_BANK_ENABLED", true)?;

    for (kind, var) in [
        (SourceKind::FactCheck, "GOOGLE_FACT_CHECK_API_KEY"),
        (SourceKind::WebSearch, "TAVILY_API_KEY"),
        (SourceKind::AiAnalysis, "OPENAI_API_KEY"),
    ] {
        let source = config.sources.get_mut(kind);
        source.credential = Credential::from_env(var);
        if source.credential.is_none() {
            tracing::debug!(source = %kind, var, "no key set, provider disabled");
        }
    }

    if let Ok(model) = env::var("OPENAI_MODEL") {
        config = config.with_ai_model(model);
    }
    if let Some(secs) = parse::<u64>("FACT_CHECK_CACHE_TTL_SECS")? {
        config = config.with_cache_ttl(Duration::from_secs(secs));
    }
    if let Some(capacity) = parse::<usize>("FACT_CHECK_CACHE_CAPACITY")? {
        config = config.with_cache_capacity(capacity);
    }
    if let Some(ms) = parse::<u64>("FACT_CHECK_TIMEOUT_MS")? {
        config = config.with_pipeline_timeout(Duration::from_millis(ms));
    }
    if let Some(threshold) = parse::<f32>("FACT_CHECK_CONFIDENCE_THRESHOLD")? {
        anyhow::ensure!(
            (0.0..=1.0).contains(&threshold),
            "FACT_CHECK_CONFIDENCE_THRESHOLD must be between 0 and 1"
        );
        config = config.with_confidence_threshold(threshold);
    }
    if let Some(max) = parse::<usize>("FACT_CHECK_MAX_EVIDENCE")? {
        config = config.with_max_evidence(max);
    }

    Ok(config)
}

fn parse<T>(var: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a valid number", var)),
        _ => Ok(None),
    }
}

fn flag(var: &str, default: bool) -> Result<bool> {
    match env::var(var) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            "" => Ok(default),
            other => anyhow::bail!("{} must be true or false, got {:?}", var, other),
        },
        Err(_) => Ok(default),
    }
}
