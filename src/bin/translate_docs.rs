//! Translate the textbook's English docs into the Urdu i18n tree.
//!
//! Usage: `translate-docs [API_KEY] [--mode all|critical] [--model M] [--delay SECS]`
//!
//! The API key falls back to `GEMINI_API_KEY`, then to `translation.api_key`
//! in the config file.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use izma::config::Config;
use izma::translation::cli::MISSING_KEY_EXIT_CODE;
use izma::translation::{pre_run, MissingApiKey, PreRun, RunOptions, RunSettings, Selection};

#[derive(Parser, Debug)]
#[command(name = "translate-docs")]
#[command(about = "Translate English textbook docs to Urdu with Gemini")]
struct Args {
    /// Gemini API key
    #[arg(value_name = "API_KEY")]
    api_key: Option<String>,

    /// Which files to translate
    #[arg(long, value_enum, default_value = "all")]
    mode: Selection,

    /// Model name (defaults depend on the mode)
    #[arg(long)]
    model: Option<String>,

    /// Seconds to wait between requests (defaults depend on the mode)
    #[arg(long, value_name = "SECS")]
    delay: Option<u64>,

    /// Configuration file path
    #[arg(long, default_value = "config.yml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "izma=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load_with_env(&args.config)?;

    let options = RunOptions {
        api_key: args.api_key,
        selection: args.mode,
        model: args.model,
        delay_secs: args.delay,
    };
    let settings = match RunSettings::resolve(&config.translation, options) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            eprintln!(
                "{}",
                MissingApiKey::usage("translate-docs", "[--mode all|critical]")
            );
            std::process::exit(MISSING_KEY_EXIT_CODE);
        }
    };
    tracing::info!("Using model {}", settings.model);

    let selection = settings.selection;
    let translator = settings.translator(&config.translation)?;

    let rule = "=".repeat(70);
    println!("{rule}\n{}\n{rule}", selection.title());

    let plan = translator.plan()?;
    if selection.partitions_translated() {
        println!("\nFound {} total English files", plan.discovered);
        println!("Already translated: {}", plan.already_translated.len());
        println!("Need to translate: {}\n", plan.pending.len());

        if pre_run(&plan) == PreRun::NothingPending {
            println!("[OK] All files already translated!");
            return Ok(());
        }

        println!("About to translate {} files.", plan.pending.len());
        println!(
            "Estimated time: {} minutes\n",
            plan.estimated_minutes(translator.delay())
        );
    } else {
        println!("Total files to translate: {}\n", plan.pending.len());
    }

    let report = translator.run(&plan).await;

    println!("\n{rule}\nTRANSLATION COMPLETE!\n{rule}");
    print!("{}", report.summary());
    println!("\nNext steps:");
    println!("1. Run: cd textbook && npm run build");
    println!("2. Test Urdu pages at /ur/...");

    Ok(())
}
