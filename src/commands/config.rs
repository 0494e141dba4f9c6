//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::print_json;
use crate::config::Config;
use crate::entity::EntityKind;
use crate::error::Result;
use crate::paths;

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;

    let page_sizes: serde_json::Map<String, serde_json::Value> = EntityKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_string(), json!(config.page_size(*kind))))
        .collect();

    if output_json {
        return print_json(&json!({
            "base_url": config.base_url,
            "request_timeout": config.request_timeout,
            "search_debounce_ms": config.search_debounce_ms,
            "page_size": page_sizes,
            "logging": {
                "level": config.logging.level,
                "format": config.logging.format,
            },
            "config_file": paths::config_path().to_string_lossy(),
        }));
    }

    println!("{}\n", "Configuration:".cyan().bold());
    println!("{}: {}", "base_url".cyan(), config.base_url);
    println!("{}: {}s", "request_timeout".cyan(), config.request_timeout);
    println!(
        "{}: {}ms",
        "search_debounce_ms".cyan(),
        config.search_debounce_ms
    );

    println!("{}:", "page_size".cyan());
    for kind in EntityKind::ALL {
        println!("  {}: {}", kind, config.page_size(*kind));
    }

    println!("{}:", "logging".cyan());
    println!("  level: {}", config.logging.level);
    println!("  format: {}", config.logging.format);

    println!(
        "\n{}",
        format!("Config file: {}", paths::config_path().display()).dimmed()
    );
    Ok(())
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_file()?;
    config.set(key, value)?;
    config.save()?;

    println!("Set {} = {}", key.cyan(), value.trim());
    Ok(())
}
