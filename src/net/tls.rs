//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("{kind} file not found: {path:?}")]
    NotFound { kind: &'static str, path: PathBuf },

    #[error("no PEM certificate in {0:?}")]
    NoCertificates(PathBuf),

    #[error("no PEM private key in {0:?}")]
    NoPrivateKey(PathBuf),

    #[error("failed to read TLS material: {0}")]
    Io(#[from] std::io::Error),
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    check_pem_files(cert_path, key_path)?;
    Ok(RustlsConfig::from_pem_file(cert_path, key_path).await?)
}

/// Check that both files exist and contain the expected PEM sections, so a
/// misconfigured replica fails with a precise message before binding.
pub fn check_pem_files(cert_path: &Path, key_path: &Path) -> Result<(), TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::NotFound {
            kind: "Certificate",
            path: cert_path.to_path_buf(),
        });
    }
    if !key_path.exists() {
        return Err(TlsError::NotFound {
            kind: "Private key",
            path: key_path.to_path_buf(),
        });
    }

    let mut reader = BufReader::new(File::open(cert_path)?);
    let certs = rustls_pemfile::certs(&mut reader).collect::<Result<Vec<_>, _>>()?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificates(cert_path.to_path_buf()));
    }

    let mut reader = BufReader::new(File::open(key_path)?);
    if rustls_pemfile::private_key(&mut reader)?.is_none() {
        return Err(TlsError::NoPrivateKey(key_path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_with(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_certificate() {
        let key = file_with("");
        let err = check_pem_files(Path::new("/no/such/cert.pem"), key.path()).unwrap_err();
        assert!(matches!(err, TlsError::NotFound { kind: "Certificate", .. }));
    }

    #[test]
    fn missing_key() {
        let cert = file_with("");
        let err = check_pem_files(cert.path(), Path::new("/no/such/key.pem")).unwrap_err();
        assert!(matches!(err, TlsError::NotFound { kind: "Private key", .. }));
    }

    #[test]
    fn non_pem_certificate_rejected() {
        let cert = file_with("not a certificate\n");
        let key = file_with("not a key\n");
        let err = check_pem_files(cert.path(), key.path()).unwrap_err();
        assert!(matches!(err, TlsError::NoCertificates(_)));
    }
}
