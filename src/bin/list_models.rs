//! List the Gemini models that can generate content.
//!
//! Usage: `list-models [API_KEY]` (falls back to `GEMINI_API_KEY`)

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use izma::config::Config;
use izma::translation::cli::MISSING_KEY_EXIT_CODE;
use izma::translation::{resolve_api_key, GeminiClient, MissingApiKey};

#[derive(Parser, Debug)]
#[command(name = "list-models")]
#[command(about = "List Gemini models supporting generateContent")]
struct Args {
    /// Gemini API key
    #[arg(value_name = "API_KEY")]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(long, default_value = "config.yml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "izma=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::load_with_env(&args.config)?;

    let api_key = match resolve_api_key(&config.translation, args.api_key.as_deref()) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            eprintln!("{}", MissingApiKey::usage("list-models", ""));
            std::process::exit(MISSING_KEY_EXIT_CODE);
        }
    };

    let model = config.translation.model.clone().unwrap_or_default();
    let client = GeminiClient::from_config(&config.translation, api_key, model)?;

    let rule = "=".repeat(70);
    println!("{rule}\nAVAILABLE GEMINI MODELS\n{rule}");

    for model in client.list_models().await? {
        if !model.supports("generateContent") {
            continue;
        }
        println!("\nModel: {}", model.name);
        println!("  Display Name: {}", model.display_name);
        println!("  Description: {}", model.description);
        println!(
            "  Supported Methods: {}",
            model.supported_generation_methods.join(", ")
        );
    }

    Ok(())
}
