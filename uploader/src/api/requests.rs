use chrono::NaiveDate;
use serde::Serialize;

use crate::infra::certificates::CertificateMaterial;

/// Body of `POST /sslcert`. Field order is part of the signed body.
#[derive(Serialize, Eq, PartialEq, Debug, Clone)]
pub struct UploadCertificateRequest {
    pub name: String,
    pub common_name: String,
    pub ca: String,
    pub pri: String,
}

impl UploadCertificateRequest {
    pub fn build(domain: &str, today: NaiveDate, material: &CertificateMaterial) -> Self {
        UploadCertificateRequest {
            name: certificate_name(domain, today),
            common_name: domain.to_string(),
            ca: material.certificate_pem.clone(),
            pri: material.private_key_pem.clone(),
        }
    }
}

/// Body of `PUT /domain/<domain>/httpsconf`.
#[derive(Serialize, Eq, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DomainHttpsConfRequest {
    pub cert_id: String,
    pub force_https: bool,
}

impl DomainHttpsConfRequest {
    pub fn forcing_https(cert_id: &str) -> Self {
        DomainHttpsConfRequest {
            cert_id: cert_id.to_string(),
            force_https: true,
        }
    }
}

/// `<domain>-<YYYYMMDD>`
pub fn certificate_name(domain: &str, today: NaiveDate) -> String {
    format!("{domain}-{}", today.format("%Y%m%d"))
}

pub fn domain_https_conf_path(domain: &str) -> String {
    format!("/domain/{domain}/httpsconf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestResult;

    #[test]
    fn test_certificate_name() -> TestResult<()> {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).ok_or("bad date")?;
        assert_eq!(
            "cdn.example.com-20240309",
            certificate_name("cdn.example.com", today)
        );
        Ok(())
    }

    #[test]
    fn test_upload_request_json_keeps_field_order() -> TestResult<()> {
        let req = UploadCertificateRequest {
            name: "n".to_string(),
            common_name: "c".to_string(),
            ca: "cert".to_string(),
            pri: "key".to_string(),
        };
        assert_eq!(
            r#"{"name":"n","common_name":"c","ca":"cert","pri":"key"}"#,
            serde_json::to_string(&req)?
        );
        Ok(())
    }

    #[test]
    fn test_domain_https_conf_json() -> TestResult<()> {
        let req = DomainHttpsConfRequest::forcing_https("abc123");
        assert_eq!(
            r#"{"certId":"abc123","forceHttps":true}"#,
            serde_json::to_string(&req)?
        );
        assert_eq!(
            "/domain/cdn.example.com/httpsconf",
            domain_https_conf_path("cdn.example.com")
        );
        Ok(())
    }
}
