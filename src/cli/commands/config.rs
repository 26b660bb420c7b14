use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigOutput {
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config)
            .unwrap_or_else(|e| format!("Failed to render configuration: {e}"))
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}

pub fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let mut config = config.clone();
    // Never echo secrets.
    for key in [&mut config.embedding.api_key, &mut config.synthesis.api_key] {
        if key.is_some() {
            *key = Some("********".to_string());
        }
    }

    output(&ConfigOutput { config }, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_output_is_yaml_that_parses_back() {
        let rendered = ConfigOutput {
            config: Config::default(),
        }
        .to_human();

        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed.chunking.chunk_size, 1000);
        assert_eq!(parsed.retrieval.top_k, 4);
    }
}
