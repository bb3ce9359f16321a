//! The `quizforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizforge.toml").exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write("quizforge.toml", SAMPLE_CONFIG)?;
        println!("Created quizforge.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY and/or OPENAI_API_KEY (or edit quizforge.toml)");
    println!("  2. Run: quizforge generate --topic \"Photosynthesis\" --count 4 --type mixed --provider gemini");
    println!("  3. Run: quizforge list");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

generation_temperature = 0.7
evaluation_temperature = 0.0
evaluation_max_tokens = 300
store_path = "./quizforge-tests.json"

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"
model = "gemini-1.5-flash"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"
model = "gpt-4"
"#;
