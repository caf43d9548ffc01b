//! Signer Configuration
//!
//! Settings applied by [`crate::channel::ChannelSigner`]:
//! - Recovery byte convention for produced signatures
//! - Debug logging switch
//!
//! Presets cover the two conventions; `from_env` layers environment
//! overrides on top of the canonical preset.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// Environment variable selecting the recovery byte convention
pub const ENV_RECOVERY_ID_FORMAT: &str = "MICROPAY_RECOVERY_ID_FORMAT";

/// Environment variable enabling debug logging
pub const ENV_DEBUG: &str = "MICROPAY_DEBUG";

/// How the last signature byte is written
///
/// Recovery accepts both conventions regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryIdFormat {
    /// v in {0, 1}
    #[default]
    Canonical,
    /// v in {27, 28}
    Legacy,
}

impl FromStr for RecoveryIdFormat {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" | "0" => Ok(RecoveryIdFormat::Canonical),
            "legacy" | "27" => Ok(RecoveryIdFormat::Legacy),
            other => Err(CryptoError::UnsupportedType(format!(
                "recovery id format '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for RecoveryIdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryIdFormat::Canonical => write!(f, "canonical"),
            RecoveryIdFormat::Legacy => write!(f, "legacy"),
        }
    }
}

/// Signer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerSettings {
    /// Convention for the recovery byte of produced signatures
    pub recovery_id_format: RecoveryIdFormat,
    /// Emit debug-level log entries
    pub debug_logging: bool,
}

impl Default for SignerSettings {
    fn default() -> Self {
        Self::canonical()
    }
}

impl SignerSettings {
    /// Canonical preset: v in {0, 1}
    pub fn canonical() -> Self {
        Self {
            recovery_id_format: RecoveryIdFormat::Canonical,
            debug_logging: false,
        }
    }

    /// Legacy preset: v in {27, 28}, for contracts that expect the old convention
    pub fn legacy() -> Self {
        Self {
            recovery_id_format: RecoveryIdFormat::Legacy,
            ..Self::canonical()
        }
    }

    /// Canonical preset with environment overrides applied
    pub fn from_env() -> CryptoResult<Self> {
        let mut settings = Self::canonical();

        if let Ok(format) = env::var(ENV_RECOVERY_ID_FORMAT) {
            settings.recovery_id_format = format.parse()?;
        }
        if let Ok(debug) = env::var(ENV_DEBUG) {
            settings.debug_logging = parse_flag(&debug);
        }

        Ok(settings)
    }

    pub fn with_recovery_id_format(mut self, format: RecoveryIdFormat) -> Self {
        self.recovery_id_format = format;
        self
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Push process-wide side effects of these settings (the log level)
    pub fn apply(&self) {
        if self.debug_logging {
            super::logging::enable_debug();
        } else {
            super::logging::disable_debug();
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
