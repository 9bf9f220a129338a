//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::{ConfigError, TlsConfig};

/// Check that `cert_path` holds at least one certificate and `key_path` a private key.
pub fn check_pem_files(cert_path: &Path, key_path: &Path) -> Result<(), ConfigError> {
    let open = |path: &Path, kind: &str| {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| ConfigError::Tls(format!("{kind} file {}: {e}", path.display())))
    };

    let mut certs = open(cert_path, "certificate")?;
    let cert_count = rustls_pemfile::certs(&mut certs)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConfigError::Tls(format!("certificate file {}: {e}", cert_path.display())))?
        .len();
    if cert_count == 0 {
        return Err(ConfigError::Tls(format!(
            "no certificates found in {}",
            cert_path.display()
        )));
    }

    let mut key = open(key_path, "private key")?;
    match rustls_pemfile::private_key(&mut key) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ConfigError::Tls(format!(
            "no private key found in {}",
            key_path.display()
        ))),
        Err(e) => Err(ConfigError::Tls(format!(
            "private key file {}: {e}",
            key_path.display()
        ))),
    }
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, ConfigError> {
    let cert_path = Path::new(&tls.cert_path);
    let key_path = Path::new(&tls.key_path);

    check_pem_files(cert_path, key_path)?;

    tracing::info!(cert = %cert_path.display(), key = %key_path.display(), "Using certificates");

    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| ConfigError::Tls(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_files_are_config_errors() {
        let err = check_pem_files(Path::new("/no/such.crt"), Path::new("/no/such.key")).unwrap_err();
        assert!(matches!(err, ConfigError::Tls(ref msg) if msg.contains("/no/such.crt")));
    }

    #[test]
    fn empty_certificate_file_rejected() {
        let cert = file_with("");
        let key = file_with("");
        let err = check_pem_files(cert.path(), key.path()).unwrap_err();
        assert!(err.to_string().contains("no certificates found"));
    }
}
