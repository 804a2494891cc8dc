use anyhow::Result;
use config::Config;
use serde::Deserialize;


#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub writer: WriterConfig,
    pub reader: ReaderConfig,
    pub logging: LoggingConfig,
}

/// Options applied when serializing vCards.
#[derive(Debug, Clone, Deserialize)]
pub struct WriterConfig {
    /// Target version ("2.1", "3.0" or "4.0"). When absent, each vCard is
    /// written in its own version.
    pub version: Option<String>,
    /// Skip properties the target version does not support.
    pub strict: bool,
    /// Emit an auto-generated PRODID property.
    pub product_id: bool,
    /// Fold content lines at 75 octets.
    pub fold_lines: bool,
    /// Use RFC 6868 caret encoding for parameter values (3.0 and 4.0).
    pub caret_encoding: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    /// Version assumed when a vCard has no VERSION property.
    pub default_version: String,
    /// Use RFC 6868 caret decoding for parameter values (3.0 and 4.0).
    pub caret_encoding: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            version: None,
            strict: true,
            product_id: true,
            fold_lines: true,
            caret_encoding: true,
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_version: "3.0".to_string(),
            caret_encoding: true,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `cardwright.toml` into a `Settings`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("writer.strict", true)?
            .set_default("writer.product_id", true)?
            .set_default("writer.fold_lines", true)?
            .set_default("writer.caret_encoding", true)?
            .set_default("reader.default_version", "3.0")?
            .set_default("reader.caret_encoding", true)?
            .set_default("logging.level", "info")?
            // TOML file
            .add_source(config::File::with_name("cardwright.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("CARDWRIGHT")
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
