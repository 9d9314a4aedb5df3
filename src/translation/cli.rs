//! Run setup shared by the `translate-docs` and `list-models` binaries
//!
//! Everything the binaries decide before talking to the API lives here:
//! which key, model and delay to use, and whether a run has anything to do.

use std::time::Duration;

use super::batch::{BatchPlan, BatchTranslator};
use super::gemini::{GeminiClient, TranslateError};
use super::layout::DocsLayout;
use super::selection::Selection;
use crate::config::TranslationConfig;

/// Process exit status when no API key could be found
pub const MISSING_KEY_EXIT_CODE: i32 = 1;

#[derive(Debug, thiserror::Error)]
#[error("GEMINI_API_KEY not provided!")]
pub struct MissingApiKey;

impl MissingApiKey {
    /// Hint printed after the error, e.g. `Run: list-models YOUR_API_KEY`
    pub fn usage(binary: &str, extra_args: &str) -> String {
        if extra_args.is_empty() {
            format!("Run: {} YOUR_API_KEY", binary)
        } else {
            format!("Run: {} YOUR_API_KEY {}", binary, extra_args)
        }
    }
}

/// Key from the command line, else `GEMINI_API_KEY`, else the config file.
///
/// `config` must already carry environment overrides
/// (see [`crate::config::Config::load_with_env`]).
pub fn resolve_api_key(
    config: &TranslationConfig,
    explicit: Option<&str>,
) -> Result<String, MissingApiKey> {
    config.resolve_api_key(explicit).ok_or(MissingApiKey)
}

/// Raw choices from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub api_key: Option<String>,
    pub selection: Selection,
    pub model: Option<String>,
    pub delay_secs: Option<u64>,
}

/// Fully resolved settings for a translation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub api_key: String,
    pub selection: Selection,
    pub model: String,
    pub delay: Duration,
}

impl RunSettings {
    /// Model: `--model`, then `translation.model`, then the selection default.
    /// Delay: `--delay`, then the selection default.
    pub fn resolve(config: &TranslationConfig, options: RunOptions) -> Result<Self, MissingApiKey> {
        let api_key = resolve_api_key(config, options.api_key.as_deref())?;
        let selection = options.selection;

        let model = options
            .model
            .or_else(|| config.model.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| selection.default_model().to_string());
        let delay = options
            .delay_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| selection.default_delay());

        Ok(Self {
            api_key,
            selection,
            model,
            delay,
        })
    }

    /// Batch translator backed by Gemini with these settings
    pub fn translator(&self, config: &TranslationConfig) -> Result<BatchTranslator, TranslateError> {
        let client = GeminiClient::from_config(config, self.api_key.clone(), self.model.clone())?;
        Ok(BatchTranslator::new(
            std::sync::Arc::new(client),
            DocsLayout::from_config(config),
            self.selection,
        )
        .with_delay(self.delay))
    }
}

/// What to do once the plan is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreRun {
    Proceed,
    /// Every file already has Urdu; report success and stop
    NothingPending,
}

pub fn pre_run(plan: &BatchPlan) -> PreRun {
    if plan.pending.is_empty() {
        PreRun::NothingPending
    } else {
        PreRun::Proceed
    }
}
