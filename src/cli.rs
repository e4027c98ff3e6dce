use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "conduit")]
#[command(about = "Interactive client for the Conduit blogging API")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// API base URL, overriding the config file
    #[arg(long)]
    pub api_url: Option<String>,

    /// Token storage file, overriding the config file
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Fragment to start at, e.g. `/article/some-slug`
    #[arg(long)]
    pub route: Option<String>,
}

impl Cli {
    /// Loads the config file and applies flag overrides.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let path = self.config.clone().unwrap_or_else(Config::config_path);
        let mut config = Config::load_from(&path)?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(path) = &self.token_file {
            config.storage.token_path = path.clone();
        }
    }

    pub fn initial_fragment(&self) -> &str {
        self.route.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "conduit",
            "--api-url",
            "http://localhost:3000/api",
            "--token-file",
            "/tmp/token.json",
            "--route",
            "/login",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert_eq!(config.storage.token_path, PathBuf::from("/tmp/token.json"));
        assert_eq!(cli.initial_fragment(), "/login");
    }

    #[test]
    fn no_flags_keep_defaults() {
        let cli = Cli::parse_from(["conduit"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
        assert_eq!(cli.initial_fragment(), "");
    }
}
