//! # Dispatch Configuration Module
//!
//! Settings that change how the dispatcher negotiates bodies and how it
//! reacts to failing callbacks. Configuration can come from three places:
//!
//! - [`DispatchConfig::default()`] - built-in defaults
//! - [`DispatchConfig::from_env()`] - environment variables
//! - [`DispatchConfig::load()`] / [`DispatchConfig::from_toml_str()`] - a TOML file
//!
//! ## Environment Variables
//!
//! | Variable                     | Field                  | Default                    |
//! |------------------------------|------------------------|----------------------------|
//! | `CABLE_DEFAULT_CONTENT_TYPE` | `default_content_type` | `application/octet-stream` |
//! | `CABLE_DEFAULT_ACCEPT`       | `default_accept`       | `application/json`         |
//! | `CABLE_QUALITY_PARSING`      | `quality_parsing`      | `strict` (`rfc` also accepted) |
//! | `CABLE_RECOVER_PANICS`       | `recover_panics`       | `true`                     |
//!
//! ## TOML
//!
//! ```toml
//! default_accept = "application/xml"
//! quality_parsing = "rfc"
//! recover_panics = false
//! ```
//!
//! Keys that are left out keep their defaults.
//!
//! ## Quality parsing
//!
//! The default `strict` mode honours an `Accept` `q` parameter only when it is
//! a 3-character token such as `0.8`. Existing clients depend on `q=1` and
//! `q=0.85` being read as 1.0. Switch to `rfc` for standard RFC 9110 qvalues.

use std::env;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::negotiation::QualityParsing;

/// `Content-Type` assumed when a request carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
/// `Accept` assumed when a request carries none.
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Media type used for decoding when `Content-Type` is absent
    pub default_content_type: String,
    /// `Accept` value used for encoding when the header is absent
    pub default_accept: String,
    /// How `q` parameters are read
    pub quality_parsing: QualityParsing,
    /// Turn panics in filters and handlers into a 500 for that request only.
    /// When false a panic unwinds through [`Dispatcher::handle`](crate::Dispatcher::handle).
    pub recover_panics: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            default_accept: DEFAULT_ACCEPT.to_string(),
            quality_parsing: QualityParsing::default(),
            recover_panics: true,
        }
    }
}

impl DispatchConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults. Unparseable booleans are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(val) = env::var("CABLE_DEFAULT_CONTENT_TYPE") {
            if !val.trim().is_empty() {
                config.default_content_type = val.trim().to_string();
            }
        }
        if let Ok(val) = env::var("CABLE_DEFAULT_ACCEPT") {
            if !val.trim().is_empty() {
                config.default_accept = val.trim().to_string();
            }
        }
        if let Ok(val) = env::var("CABLE_QUALITY_PARSING") {
            config.quality_parsing = QualityParsing::parse(&val);
        }
        if let Ok(val) = env::var("CABLE_RECOVER_PANICS") {
            if let Some(flag) = parse_bool(&val) {
                config.recover_panics = flag;
            }
        }
        config
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Fails when the text is not valid TOML or a key has the wrong type.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid dispatch configuration")
    }

    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not parse.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in config file {}", path.display()))
    }
}

pub(crate) fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
