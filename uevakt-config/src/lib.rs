//! # UE Operator Configuration
//!
//! Static configuration surface for the UE simulator operator.
//!
//! ## Features
//! - **Layered loading**: defaults, then a YAML file, then `UEVAKT_*`
//!   environment variables
//! - **Validation**: every option checked against its documented type, range
//!   and format before a reconcile cycle is allowed to use it
//! - **Fail-fast reporting**: the first offending option is named in the
//!   operator-facing message rather than aggregated into a wall of text

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod validation;

pub use error::ConfigError;
pub use validation::{parse_sd_text, SD_MAX};

/// Default on-disk location of the operator's configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "config/ue.yaml";

/// Legacy Slice Differentiator option.
///
/// Operators historically supplied this either as a plain integer or as a
/// `0x`-prefixed hex string; both are accepted and canonicalized downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SdValue {
    Numeric(u32),
    Text(String),
}

impl SdValue {
    /// The numeric value, if the option is well-formed and within range.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            SdValue::Numeric(value) => (*value <= SD_MAX).then_some(*value),
            SdValue::Text(text) => parse_sd_text(text),
        }
    }
}

/// Immutable-per-reconcile snapshot of the operator-set options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UeConfig {
    /// IMSI identifying the simulated subscriber.
    #[serde(default = "default_imsi")]
    #[validate(custom(function = validation::validate_imsi))]
    pub imsi: String,

    /// Secret key for the USIM, 128 bits in hex.
    #[serde(default = "default_usim_key")]
    #[validate(custom(function = validation::validate_secret_key))]
    pub usim_key: String,

    /// Operator secret key (OPc), 128 bits in hex.
    #[serde(default = "default_operator_key")]
    #[validate(custom(function = validation::validate_secret_key))]
    pub operator_key: String,

    /// Data Network Name the UE attaches to.
    #[serde(default = "default_dnn")]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub dnn: String,

    /// Whether the UE radio runs against an RF simulator endpoint.
    #[serde(default = "default_true")]
    pub simulation_mode: bool,

    /// Enable 3/4 sampling rate on the radio front-end.
    #[serde(default)]
    pub use_three_quarter_sampling: bool,

    /// Enable the two-antenna MIMO receive path.
    #[serde(default)]
    pub use_mimo: bool,

    /// Legacy Slice/Service Type, used only while no relation provides one.
    #[serde(default)]
    pub sst: Option<u8>,

    /// Legacy Slice Differentiator, used only while no relation provides one.
    #[serde(default)]
    #[validate(custom(function = validation::validate_sd))]
    pub sd: Option<SdValue>,
}

fn default_imsi() -> String {
    "208930100007487".into()
}

fn default_usim_key() -> String {
    "5122250214c33e723a5dd523fc145fc0".into()
}

fn default_operator_key() -> String {
    "981d464c7c52eb6e5036234984ad0bcf".into()
}

fn default_dnn() -> String {
    "internet".into()
}

fn default_true() -> bool {
    true
}

impl Default for UeConfig {
    fn default() -> Self {
        Self {
            imsi: default_imsi(),
            usim_key: default_usim_key(),
            operator_key: default_operator_key(),
            dnn: default_dnn(),
            simulation_mode: default_true(),
            use_three_quarter_sampling: false,
            use_mimo: false,
            sst: None,
            sd: None,
        }
    }
}

impl UeConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Built-in defaults
    /// 2. `config/ue.yaml` - base settings. If missing, defaults are used.
    /// 3. `UEVAKT_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(UeConfig::default()));

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            figment = figment.merge(Yaml::file(DEFAULT_CONFIG_FILE));
        }

        figment
            .merge(Env::prefixed("UEVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Figment::from(Serialized::defaults(UeConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("UEVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Run the per-cycle validation gate over an already-built snapshot.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}
