//! TLS configuration and credential loading

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::RootCertStore;
use tokio_rustls::TlsAcceptor;

use kpimon_core::config::ServerConfig;
use kpimon_core::ServerError;

/// Build the TLS acceptor for `config`.
///
/// Returns `None` when no key/certificate pair is configured, in which case
/// the server speaks plaintext.
pub(crate) fn build_acceptor(config: &ServerConfig) -> Result<Option<TlsAcceptor>, ServerError> {
    let (key_path, cert_path) = match (&config.key_path, &config.cert_path) {
        (Some(key), Some(cert)) => (key, cert),
        (None, None) if config.insecure => return Ok(None),
        (None, None) => {
            return Err(ServerError::Tls(
                "client verification requires a server key and certificate".to_string(),
            ))
        }
        _ => {
            return Err(ServerError::Tls(
                "key and certificate must be supplied together".to_string(),
            ))
        }
    };

    let certs = load_certs("certificate", cert_path)?;
    let key = load_key(key_path)?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = rustls::ServerConfig::builder_with_provider(Arc::clone(&provider))
        .with_safe_default_protocol_versions()
        .map_err(tls_error)?;

    let builder = if config.insecure {
        builder.with_no_client_auth()
    } else {
        let ca_path = config.ca_path.as_ref().ok_or_else(|| {
            ServerError::Tls("client verification requires a CA certificate".to_string())
        })?;

        let mut roots = RootCertStore::empty();
        for cert in load_certs("CA certificate", ca_path)? {
            roots.add(cert).map_err(tls_error)?;
        }

        let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider)
            .build()
            .map_err(tls_error)?;
        builder.with_client_cert_verifier(verifier)
    };

    let tls = builder.with_single_cert(certs, key).map_err(tls_error)?;
    Ok(Some(TlsAcceptor::from(Arc::new(tls))))
}

fn tls_error(e: impl std::fmt::Display) -> ServerError {
    ServerError::Tls(e.to_string())
}

fn open(kind: &'static str, path: &Path) -> Result<BufReader<File>, ServerError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| ServerError::Credentials {
            kind,
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Load every PEM certificate in `path`
fn load_certs(
    kind: &'static str,
    path: &Path,
) -> Result<Vec<CertificateDer<'static>>, ServerError> {
    let mut reader = open(kind, path)?;
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Credentials {
            kind,
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if certs.is_empty() {
        return Err(ServerError::Credentials {
            kind,
            path: path.to_path_buf(),
            message: "no PEM certificates found".to_string(),
        });
    }
    Ok(certs)
}

/// Load the first PEM private key in `path`
fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, ServerError> {
    let kind = "private key";
    let mut reader = open(kind, path)?;
    let credentials_error = |message: String| ServerError::Credentials {
        kind,
        path: path.to_path_buf(),
        message,
    };

    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| credentials_error(e.to_string()))?
        .ok_or_else(|| credentials_error("no PEM private key found".to_string()))
}
