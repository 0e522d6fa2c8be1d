//! Manager configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::certs::CertPaths;
use super::serde_utils::fractional_secs;
use crate::error::ConfigError;

/// Configuration for the KPI monitor manager
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Path to the CA certificate
    pub ca_path: Option<PathBuf>,

    /// Path to the private key
    pub key_path: Option<PathBuf>,

    /// Path to the certificate
    pub cert_path: Option<PathBuf>,

    /// E2 termination endpoint (`host:port`)
    pub e2t_endpoint: String,

    /// Northbound listening port
    pub grpc_port: u16,

    /// Northbound security options
    pub security: SecurityConfig,

    /// Southbound session tuning
    pub southbound: SouthboundConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            ca_path: None,
            key_path: None,
            cert_path: None,
            e2t_endpoint: "onos-e2t:5150".to_string(),
            grpc_port: 5150,
            security: SecurityConfig::default(),
            southbound: SouthboundConfig::default(),
        }
    }
}

impl ManagerConfig {
    /// The credential paths as a group
    pub fn cert_paths(&self) -> CertPaths {
        CertPaths {
            ca_path: self.ca_path.clone(),
            key_path: self.key_path.clone(),
            cert_path: self.cert_path.clone(),
        }
    }
}

/// Authentication and authorization switches for the northbound server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub authentication_enabled: bool,
    pub authorization_enabled: bool,
}

/// Southbound session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SouthboundConfig {
    /// Timeout for a single connection attempt
    #[serde(with = "fractional_secs")]
    pub connect_timeout: Duration,

    /// Backoff configuration for reconnections
    pub backoff: BackoffConfig,
}

impl SouthboundConfig {
    /// Reject settings that would stall or spin the reconnect loop
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "southbound.connect_timeout must be greater than zero".to_string(),
            ));
        }
        self.backoff.validate()
    }
}

impl Default for SouthboundConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            backoff: BackoffConfig::default(),
        }
    }
}

/// Exponential backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Initial delay
    #[serde(with = "fractional_secs")]
    pub initial: Duration,

    /// Maximum delay
    #[serde(with = "fractional_secs")]
    pub max: Duration,

    /// Multiplier for each retry
    pub multiplier: f64,

    /// Jitter factor (0.0 to 1.0)
    pub jitter: f64,
}

impl BackoffConfig {
    /// Check that the backoff grows, stays bounded and never hands out a zero delay
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Invalid(message));

        if self.initial.is_zero() {
            return invalid("backoff.initial must be greater than zero".to_string());
        }
        if self.max < self.initial {
            return invalid(format!(
                "backoff.max ({:?}) is below backoff.initial ({:?})",
                self.max, self.initial
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return invalid(format!(
                "backoff.multiplier must be a finite number >= 1.0, got {}",
                self.multiplier
            ));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return invalid(format!(
                "backoff.jitter must be between 0.0 and 1.0, got {}",
                self.jitter
            ));
        }
        Ok(())
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.e2t_endpoint, "onos-e2t:5150");
        assert_eq!(config.grpc_port, 5150);
        assert_eq!(config.security, SecurityConfig::default());
        assert_eq!(config.southbound.backoff.max, Duration::from_secs(60));
    }

    fn backoff(initial: Duration, max: Duration, multiplier: f64, jitter: f64) -> BackoffConfig {
        BackoffConfig {
            initial,
            max,
            multiplier,
            jitter,
        }
    }

    #[test]
    fn test_default_southbound_is_valid() {
        assert!(SouthboundConfig::default().validate().is_ok());
    }

    #[test]
    fn test_backoff_rejects_bad_values() {
        let secs = Duration::from_secs;
        let cases = [
            ("zero initial", backoff(Duration::ZERO, secs(60), 2.0, 0.25)),
            ("max below initial", backoff(secs(10), secs(5), 2.0, 0.25)),
            ("negative multiplier", backoff(secs(1), secs(60), -2.0, 0.25)),
            ("shrinking multiplier", backoff(secs(1), secs(60), 0.5, 0.25)),
            ("NaN multiplier", backoff(secs(1), secs(60), f64::NAN, 0.25)),
            ("infinite multiplier", backoff(secs(1), secs(60), f64::INFINITY, 0.25)),
            ("negative jitter", backoff(secs(1), secs(60), 2.0, -0.1)),
            ("jitter above one", backoff(secs(1), secs(60), 2.0, 1.5)),
            ("NaN jitter", backoff(secs(1), secs(60), 2.0, f64::NAN)),
        ];

        for (name, config) in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{} accepted",
                name
            );
        }
    }

    #[test]
    fn test_backoff_accepts_edges() {
        let config = backoff(Duration::from_millis(10), Duration::from_millis(10), 1.0, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_connect_timeout_rejected() {
        let config = SouthboundConfig {
            connect_timeout: Duration::ZERO,
            ..SouthboundConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_negative_multiplier_from_file_rejected() {
        let config: ManagerConfig = toml::from_str(
            r#"
[southbound.backoff]
initial = 1
max = 60
multiplier = -2.0
jitter = 0.25
"#,
        )
        .unwrap();
        assert!(config.southbound.validate().is_err());
    }

    #[test]
    fn test_sub_second_backoff_from_file() {
        let config: ManagerConfig = toml::from_str(
            r#"
[southbound]
connect_timeout = 0.5

[southbound.backoff]
initial = 0.01
max = 0.05
multiplier = 2.0
jitter = 0.0
"#,
        )
        .unwrap();
        assert_eq!(config.southbound.connect_timeout, Duration::from_millis(500));
        assert_eq!(config.southbound.backoff.initial, Duration::from_millis(10));
        assert!(config.southbound.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip_keeps_paths() {
        let config = ManagerConfig {
            ca_path: Some(PathBuf::from("/etc/kpimon/ca.crt")),
            key_path: Some(PathBuf::from("/etc/kpimon/tls.key")),
            cert_path: Some(PathBuf::from("/etc/kpimon/tls.crt")),
            ..ManagerConfig::default()
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let decoded: ManagerConfig = toml::from_str(&text).unwrap();
        assert_eq!(decoded.cert_paths(), config.cert_paths());
        assert_eq!(decoded.southbound.connect_timeout, Duration::from_secs(10));
    }
}
