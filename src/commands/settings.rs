//! `gitree settings` command.

use crate::config::Settings;

/// Execute the `settings` command: print the effective settings as YAML.
///
/// # Errors
///
/// Returns an error string if the settings cannot be serialized.
pub fn run(settings: &Settings) -> Result<(), String> {
    let yaml = serde_yaml::to_string(settings)
        .map_err(|e| format!("failed to serialize settings: {e}"))?;
    print!("{yaml}");
    Ok(())
}
