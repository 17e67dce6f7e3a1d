//! The `spacedeck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("spacedeck.toml");
    if path.exists() {
        println!("spacedeck.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created spacedeck.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set GEMINI_API_KEY (or edit spacedeck.toml) to enable hints");
    println!("  2. Run: spacedeck stats");
    println!("  3. Run: spacedeck study");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# spacedeck configuration

# Where progress is saved (default: ~/.local/share/spacedeck/progress.json)
# data_file = "./progress.json"

# "wrong-only" re-queues only missed items once their retry delay passes.
# "include-mastered-due" also brings back mastered items whose review is due.
review_policy = "wrong-only"

[hints]
# "gemini" or "offline"; gemini without a key falls back to offline hints
provider = "gemini"
api_key = "${GEMINI_API_KEY}"
model = "gemini-3-flash-preview"
timeout_secs = 20
temperature = 0.7
max_output_tokens = 256
"#;
