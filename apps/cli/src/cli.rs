use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use crate::config::{
    ENV_FORMAT, ENV_INPUT, ENV_LOG, ENV_OUTPUT, ENV_SOURCE_URL, ENV_TIMEOUT_SECS,
};

#[derive(Debug, Parser)]
#[command(name = "heatmap", version, about = "Global temperature heatmap exporter")]
pub struct CliArgs {
    /// Print summary statistics and exit
    #[arg(long)]
    pub summary: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the source document URL
    #[arg(long, value_name = "URL", conflicts_with = "input")]
    pub url: Option<String>,

    /// Read the source document from a local file
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Override the export path
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Export format: svg or html
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl CliArgs {
    /// Environment assignments implied by the flags, in the order they apply.
    pub fn env_overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        if let Some(url) = &self.url {
            overrides.push((ENV_SOURCE_URL, url.clone()));
            // blank counts as unset, so an inherited input path stops shadowing the URL
            overrides.push((ENV_INPUT, String::new()));
        }
        if let Some(input) = &self.input {
            overrides.push((ENV_INPUT, input.display().to_string()));
        }
        if let Some(output) = &self.output {
            overrides.push((ENV_OUTPUT, output.display().to_string()));
        }
        if let Some(format) = &self.format {
            overrides.push((ENV_FORMAT, format.clone()));
        }
        if let Some(timeout) = self.timeout {
            overrides.push((ENV_TIMEOUT_SECS, timeout.to_string()));
        }
        if self.debug {
            overrides.push((ENV_LOG, "debug".to_string()));
        }
        overrides
    }

    pub fn apply_env_overrides(&self) {
        for (key, value) in self.env_overrides() {
            std::env::set_var(key, value);
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, Source};
    use std::collections::HashMap;

    #[test]
    fn flags_map_to_environment_overrides() {
        let args = CliArgs::parse_from([
            "heatmap",
            "--url",
            "http://localhost/data.json",
            "--output",
            "out.svg",
            "--timeout",
            "5",
            "--debug",
        ]);

        assert_eq!(
            args.env_overrides(),
            vec![
                (ENV_SOURCE_URL, "http://localhost/data.json".to_string()),
                (ENV_INPUT, String::new()),
                (ENV_OUTPUT, "out.svg".to_string()),
                (ENV_TIMEOUT_SECS, "5".to_string()),
                (ENV_LOG, "debug".to_string()),
            ]
        );
    }

    #[test]
    fn no_flags_means_no_overrides() {
        let args = CliArgs::parse_from(["heatmap", "--summary", "--json"]);
        assert!(args.summary);
        assert!(args.json);
        assert!(args.env_overrides().is_empty());
    }

    #[test]
    fn url_and_input_are_exclusive() {
        let result =
            CliArgs::try_parse_from(["heatmap", "--url", "http://x", "--input", "data.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_mentions_summary_flag() {
        assert!(CliArgs::help_text().contains("--summary"));
    }

    #[test]
    fn url_flag_wins_over_inherited_input_file() -> color_eyre::Result<()> {
        let mut environment = HashMap::from([(ENV_INPUT.to_string(), "local.json".to_string())]);
        let args = CliArgs::parse_from(["heatmap", "--url", "http://example.test/fresh.json"]);
        for (key, value) in args.env_overrides() {
            environment.insert(key.to_string(), value);
        }

        let config = AppConfig::from_lookup(|key| environment.get(key).cloned())?;
        assert_eq!(
            config.source,
            Source::Url("http://example.test/fresh.json".to_string())
        );
        Ok(())
    }
}
