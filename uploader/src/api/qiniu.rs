use qiniu_cert_shared::signature::{sign_request, Credentials, SignRequest};
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE, HOST},
    Method, StatusCode,
};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::json;
use tracing::{debug, info, instrument};

use super::requests::{domain_https_conf_path, DomainHttpsConfRequest, UploadCertificateRequest};
use super::responses::{CertificateId, UploadCertificateResponse};
use crate::infra::{config::ApiSettings, errors::AppError};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const UPLOAD_CERTIFICATE_PATH: &str = "/sslcert";

/// The two management calls the pipeline makes, in order.
#[allow(async_fn_in_trait)]
pub trait CertificateApi {
    async fn upload_certificate(
        &self,
        req: &UploadCertificateRequest,
    ) -> Result<CertificateId, AppError>;

    /// Returns the raw response body on success.
    async fn configure_domain_https(
        &self,
        domain: &str,
        req: &DomainHttpsConfRequest,
    ) -> Result<String, AppError>;
}

#[derive(Clone)]
pub struct QiniuClient {
    http_client: ClientWithMiddleware,
    credentials: Credentials,
    api_settings: ApiSettings,
}

impl QiniuClient {
    pub fn new(
        http_client: ClientWithMiddleware,
        credentials: Credentials,
        api_settings: ApiSettings,
    ) -> Self {
        QiniuClient {
            http_client,
            credentials,
            api_settings,
        }
    }

    /// Signs and sends a JSON request. Any status comes back as-is; only transport
    /// failures are errors here.
    async fn send_signed(
        &self,
        method: Method,
        path: &str,
        body: String,
    ) -> Result<(StatusCode, String), AppError> {
        let host = self.api_settings.host.as_str();
        let signed = sign_request(
            &self.credentials,
            &SignRequest {
                method: method.as_str(),
                url_path: path,
                host,
                content_type: JSON_CONTENT_TYPE,
                body: &body,
            },
        )?;

        debug!(
            length = signed.canonical_string.len(),
            "Canonical string length"
        );
        debug!(
            "Canonical string: {}",
            signed.canonical_string.replace('\n', "\\n")
        );
        debug!(
            "Raw signature: {}",
            signed.signature.replace('-', "+").replace('_', "/")
        );
        debug!("URL-safe signature: {}", signed.signature);
        debug!("Token: {}", signed.authorization);

        let options = json!({
            "hostname": host,
            "path": path,
            "method": method.as_str(),
            "headers": {
                "Authorization": &signed.authorization,
                "Content-Type": JSON_CONTENT_TYPE,
                "Content-Length": body.len(),
                "Host": host,
            }
        });
        debug!("Request options:\n{options:#}");

        let response = self
            .http_client
            .request(method, self.api_settings.endpoint(path))
            .header(AUTHORIZATION, signed.authorization.as_str())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(HOST, host)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        info!(status = status.as_u16(), "Response status");
        debug!(headers = ?response.headers(), "Response headers");

        let response_body = response.text().await?;
        debug!("Response body: {response_body}");

        Ok((status, response_body))
    }
}

impl CertificateApi for QiniuClient {
    #[instrument(skip_all, fields(name = %req.name))]
    async fn upload_certificate(
        &self,
        req: &UploadCertificateRequest,
    ) -> Result<CertificateId, AppError> {
        let pretty = serde_json::to_string_pretty(req).map_err(AppError::RequestEncoding)?;
        debug!("Upload request data:\n{pretty}");

        let body = serde_json::to_string(req).map_err(AppError::RequestEncoding)?;
        debug!(length = body.len(), "Upload request body length");
        debug!("Upload request body: {body}");

        let (status, response_body) = self
            .send_signed(Method::POST, UPLOAD_CERTIFICATE_PATH, body)
            .await?;
        if status != StatusCode::OK {
            return Err(AppError::Protocol {
                status,
                body: response_body,
            });
        }

        let parsed: UploadCertificateResponse =
            serde_json::from_str(&response_body).map_err(AppError::ResponseParsing)?;
        parsed
            .cert_id
            .filter(|id| !id.is_empty())
            .map(CertificateId)
            .ok_or(AppError::MissingCertificateId)
    }

    #[instrument(skip_all, fields(domain = domain, cert_id = %req.cert_id))]
    async fn configure_domain_https(
        &self,
        domain: &str,
        req: &DomainHttpsConfRequest,
    ) -> Result<String, AppError> {
        let body = serde_json::to_string(req).map_err(AppError::RequestEncoding)?;
        debug!("Domain configuration body: {body}");

        let (status, response_body) = self
            .send_signed(Method::PUT, &domain_https_conf_path(domain), body)
            .await?;
        if status != StatusCode::OK {
            return Err(AppError::Protocol {
                status,
                body: response_body,
            });
        }
        Ok(response_body)
    }
}
