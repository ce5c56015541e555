use std::fs;
use std::path::Path;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config_manager::main::Config;

/// Read a configuration file, decode it and substitute `${VAR}` references
/// from the process environment.
pub fn read_config_text(config_path: &str) -> Result<String> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }

    substitute_env_vars(&content, |name| std::env::var(name).ok())
}

/// Replace `${VAR_NAME}` with the looked-up value. Unknown variables are left
/// untouched so that a later validation step can notice them.
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

/// Decode file bytes, honouring a UTF-8 or UTF-16 byte-order mark.
pub fn load_text_file_with_guess_encoding(file_path: &str) -> Result<String> {
    let bytes = fs::read(file_path)?;
    let (cow, encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        debug!(
            "Configuration {} contained invalid {} sequences; replaced lossily",
            file_path,
            encoding.name()
        );
    }
    Ok(cow.into_owned())
}

/// Parse configuration text. `.json` / `.jsonld` files are read as JSON (a
/// JSON-LD `@context` is tolerated), everything else as YAML.
pub fn parse_config(config_path: &str, content: &str) -> Result<Config> {
    let path_lower = config_path.to_lowercase();
    if path_lower.ends_with(".jsonld") || path_lower.ends_with(".json") {
        let json_value: Value = serde_json::from_str(content)?;
        validate_config(&json_value)
    } else {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

/// Validate configuration data against the Config model
pub fn validate_config(config_data: &Value) -> Result<Config> {
    let config: Config = serde_json::from_value(config_data.clone())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_variables_only() {
        let out = substitute_env_vars("key: ${API}\nother: ${MISSING}", |name| {
            (name == "API").then(|| "secret".to_string())
        })
        .unwrap();
        assert_eq!(out, "key: secret\nother: ${MISSING}");
    }

    #[test]
    fn parses_yaml_sections_with_defaults() {
        let yaml = r#"
system_config:
  port: 8080
llm_config:
  llm_provider: openai_compatible_llm
  model: gpt-4o-mini
  base_url: http://localhost:11434/v1
"#;
        let config = parse_config("conf.yaml", yaml).unwrap();
        assert_eq!(config.system_config.port, 8080);
        assert_eq!(config.system_config.host, "127.0.0.1");
        assert_eq!(config.llm_config.llm_provider, "openai_compatible_llm");
        assert_eq!(config.llm_config.classify_temperature, 0.1);
        assert_eq!(config.llm_config.respond_temperature, 0.4);
        assert!(!config.session_config.clear_active_agent_on_error);
    }

    #[test]
    fn parses_jsonld_and_ignores_context() {
        let json = r#"{
            "@context": {"@vocab": "https://hsn.example.org/config#"},
            "session_config": {"clear_active_agent_on_error": true}
        }"#;
        let config = parse_config("conf.jsonld", json).unwrap();
        assert!(config.session_config.clear_active_agent_on_error);
        assert_eq!(config.llm_config.model, "gemini-2.5-flash");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_config_text("definitely/not/here.yaml").is_err());
    }
}
