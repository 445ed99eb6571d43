//! Configuration management commands.

use std::io::Write;

use crate::cli::ConfigCommand;
use crate::output::{info, success};
use crate::CliConfig;

/// Runs a config command.
pub fn run_config(cmd: &ConfigCommand, config: &mut CliConfig) -> crate::CliResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config),
        ConfigCommand::Set { key, value } => {
            apply_setting(config, key, value)?;
            config.save()?;
            success(&format!("Set {key} = {}", display_value(key, value)));
            Ok(())
        }
        ConfigCommand::Init => init_config(config),
    }
}

/// Shows the current configuration.
fn show_config(config: &CliConfig) -> crate::CliResult<()> {
    let config_path = CliConfig::config_path()?;

    info(&format!("Configuration file: {}", config_path.display()));
    println!();
    println!(
        "backend_url: {}",
        config.backend_url.as_deref().unwrap_or("(none)")
    );
    if let Some(key) = &config.anon_key {
        println!("anon_key: {}", mask_secret(key));
    }
    println!("profiles_table: {}", config.profiles_table);
    if let Some(secs) = config.timeout_secs {
        println!("timeout_secs: {secs}");
    }
    println!("output_format: {:?}", config.output_format);

    Ok(())
}

/// Applies one `key = value` setting.
pub fn apply_setting(config: &mut CliConfig, key: &str, value: &str) -> crate::CliResult<()> {
    let cleared = value.is_empty() || value == "none";
    match key {
        "backend_url" | "url" => {
            config.backend_url = (!cleared).then(|| value.to_string());
        }
        "anon_key" | "key" => {
            config.anon_key = (!cleared).then(|| value.to_string());
        }
        "profiles_table" | "table" => {
            if cleared {
                return Err(crate::CliError::InvalidArgument(
                    "profiles_table cannot be empty".to_string(),
                ));
            }
            config.profiles_table = value.to_string();
        }
        "timeout_secs" | "timeout" => {
            config.timeout_secs = if cleared {
                None
            } else {
                Some(value.parse().map_err(|_| {
                    crate::CliError::InvalidArgument(format!("timeout_secs must be a number: {value}"))
                })?)
            };
        }
        "output_format" | "output" => {
            config.output_format = value.parse()?;
        }
        _ => {
            return Err(crate::CliError::InvalidArgument(format!(
                "Unknown configuration key: {key}. Known keys: backend_url, anon_key, profiles_table, timeout_secs, output_format"
            )));
        }
    }
    Ok(())
}

fn display_value(key: &str, value: &str) -> String {
    if matches!(key, "anon_key" | "key") {
        mask_secret(value)
    } else {
        value.to_string()
    }
}

/// Initializes configuration interactively.
fn init_config(config: &mut CliConfig) -> crate::CliResult<()> {
    let config_path = CliConfig::config_path()?;

    info("Initializing STP CLI configuration...");
    println!();

    let current_url = config.backend_url.clone().unwrap_or_default();
    let url = prompt("Backend URL", &current_url)?;
    if !url.is_empty() {
        apply_setting(config, "backend_url", &url)?;
    }

    let current_key = config.anon_key.as_deref().map(mask_secret).unwrap_or_default();
    let key = prompt("Anon key", &current_key)?;
    if !key.is_empty() {
        apply_setting(config, "anon_key", &key)?;
    }

    let table = prompt("Profiles table", &config.profiles_table.clone())?;
    if !table.is_empty() {
        apply_setting(config, "profiles_table", &table)?;
    }

    let format = prompt(
        "Output format (table/json/quiet)",
        &format!("{:?}", config.output_format).to_lowercase(),
    )?;
    if !format.is_empty() {
        apply_setting(config, "output_format", &format)?;
    }

    if config.backend_url.is_some() {
        config.backend(None, None)?;
    }
    config.save()?;

    println!();
    success(&format!("Configuration saved to: {}", config_path.display()));
    Ok(())
}

/// Reads one line from stdin; empty input keeps the current value.
fn prompt(label: &str, current: &str) -> crate::CliResult<String> {
    print!("{label} [{current}]: ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Masks all but the last four characters of a secret.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
