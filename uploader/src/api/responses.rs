use serde::*;

/// Success body of `POST /sslcert`. Only the id is used.
#[derive(Deserialize, Eq, PartialEq, Debug)]
pub struct UploadCertificateResponse {
    #[serde(rename = "certID")]
    pub cert_id: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CertificateId(pub String);

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
