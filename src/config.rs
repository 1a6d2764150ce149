use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// JSON transaction ledger.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub scores_csv: String,
    pub features_csv: Option<String>,
    pub scores_json: Option<String>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_band_width")]
    pub band_width: u16,
}

fn default_top_n() -> usize {
    10
}

fn default_band_width() -> u16 {
    100
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

impl Config {
    pub fn load(path: &str) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read config file '{}': {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| eyre::eyre!("Failed to parse config file '{}': {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.input.path.trim().is_empty() {
            return Err(eyre::eyre!("input.path must not be empty"));
        }
        if self.output.scores_csv.trim().is_empty() {
            return Err(eyre::eyre!("output.scores_csv must not be empty"));
        }
        if self.output.top_n == 0 {
            return Err(eyre::eyre!("output.top_n must be at least 1"));
        }
        let width = self.output.band_width;
        if width == 0 || width > 1000 || 1000 % width != 0 {
            return Err(eyre::eyre!(
                "output.band_width must divide 1000 evenly, got {}",
                width
            ));
        }
        Ok(())
    }
}
