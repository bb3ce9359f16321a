//! The `quizforge providers` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_providers::config::load_config_from;
use quizforge_providers::create_provider;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let names = config.configured_providers();
    if names.is_empty() {
        println!(
            "No providers configured. Set GEMINI_API_KEY or OPENAI_API_KEY, or run `quizforge init`."
        );
        return Ok(());
    }

    for name in names {
        let provider = create_provider(&config.providers[name])?;
        println!("{name}: {} (model {})", provider.kind(), provider.model());
    }

    Ok(())
}
