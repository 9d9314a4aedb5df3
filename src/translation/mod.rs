//! English → Urdu documentation translator
//!
//! Mirrors the Docusaurus docs tree into its Urdu i18n tree by sending each
//! Markdown file through a Gemini model:
//! - `script` detects files that already contain Urdu
//! - `layout` maps source paths to localized paths
//! - `selection` picks the full tree or the critical demo set
//! - `batch` drives the sequential, rate-limited run
//! - `cli` resolves key, model and delay for the binaries

pub mod batch;
pub mod cli;
pub mod gemini;
pub mod layout;
pub mod prompt;
pub mod script;
pub mod selection;

pub use batch::{BatchPlan, BatchReport, BatchTranslator, FileFailure, FileOutcome};
pub use cli::{pre_run, resolve_api_key, MissingApiKey, PreRun, RunOptions, RunSettings};
pub use gemini::{GeminiClient, ModelInfo, TextGenerator, TranslateError};
pub use layout::DocsLayout;
pub use prompt::build_prompt;
pub use script::{contains_urdu, has_urdu_content};
pub use selection::{Selection, CRITICAL_FILES};
