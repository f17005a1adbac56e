use std::{fs, io, path::Path};

use anyhow::anyhow;
use tracing::debug;

use super::{config::CertificateFileSettings, errors::AppError};

/// PEM text for the certificate chain and its private key. Never parsed, sent as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificateMaterial {
    pub certificate_pem: String,
    pub private_key_pem: String,
}

impl std::fmt::Debug for CertificateMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateMaterial")
            .field("certificate_pem_len", &self.certificate_pem.len())
            .field("private_key_pem_len", &self.private_key_pem.len())
            .finish()
    }
}

impl CertificateMaterial {
    pub fn load(settings: &CertificateFileSettings) -> Result<CertificateMaterial, AppError> {
        let certificate_pem = read_pem(&settings.certificate_path)?;
        let private_key_pem = read_pem(&settings.private_key_path)?;

        debug!("Certificate files read");
        debug!(length = certificate_pem.len(), "Certificate length");
        debug!(length = private_key_pem.len(), "Private key length");

        Ok(CertificateMaterial {
            certificate_pem,
            private_key_pem,
        })
    }
}

fn read_pem(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| {
        let err = match e.kind() {
            io::ErrorKind::NotFound => anyhow!(
                "Certificate file [{}] does not exist, run get-cert.sh to obtain a certificate first",
                path.display()
            ),
            _ => anyhow!(e).context(format!("Could not read [{}]", path.display())),
        };
        AppError::MissingConfiguration(err)
    })
}
