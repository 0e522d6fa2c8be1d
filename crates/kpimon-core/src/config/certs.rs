//! Credential path handling

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The CA, key and certificate paths supplied at process start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertPaths {
    pub ca_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
    pub cert_path: Option<PathBuf>,
}

impl CertPaths {
    /// Check that every supplied path exists and that key and certificate come as a pair.
    ///
    /// Nothing supplied at all is valid; the northbound server then serves plaintext.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_path.is_some() != self.cert_path.is_some() {
            return Err(ConfigError::UnpairedCredential);
        }

        check_exists("CA certificate", self.ca_path.as_deref())?;
        check_exists("Private key", self.key_path.as_deref())?;
        check_exists("Certificate", self.cert_path.as_deref())?;
        Ok(())
    }

    /// Whether a key/certificate pair was supplied
    pub fn has_identity(&self) -> bool {
        self.key_path.is_some() && self.cert_path.is_some()
    }
}

fn check_exists(kind: &'static str, path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) if !path.exists() => Err(ConfigError::CredentialMissing {
            kind,
            path: path.to_path_buf(),
        }),
        _ => Ok(()),
    }
}
