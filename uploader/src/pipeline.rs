//! The whole run: load the certificate files, upload them, then point the domain at the
//! uploaded certificate. Strictly sequential; the first failure ends the run.

use std::fmt;

use tracing::{error, info};

use crate::api::qiniu::CertificateApi;
use crate::api::requests::{DomainHttpsConfRequest, UploadCertificateRequest};
use crate::api::responses::CertificateId;
use crate::infra::certificates::CertificateMaterial;
use crate::infra::config::Config;
use crate::infra::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Loading,
    Uploading,
    Configuring,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Loading => "loading",
            Stage::Uploading => "uploading",
            Stage::Configuring => "configuring",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub certificate_id: CertificateId,
    pub domain_response: String,
}

pub async fn run<A: CertificateApi>(config: &Config, api: &A) -> Result<Completed, AppError> {
    let mut stage = Stage::Idle;
    let result = drive(config, api, &mut stage).await;
    match &result {
        Ok(_) => enter(&mut stage, Stage::Done),
        Err(e) => {
            error!(stage = %stage, "{e}");
            enter(&mut stage, Stage::Failed);
        }
    }
    result
}

async fn drive<A: CertificateApi>(
    config: &Config,
    api: &A,
    stage: &mut Stage,
) -> Result<Completed, AppError> {
    let domain = config.domain_settings.domain.as_str();

    enter(stage, Stage::Loading);
    let material = CertificateMaterial::load(&config.certificate_file_settings)?;
    let upload_req = UploadCertificateRequest::build(domain, config.today, &material);
    info!(name = %upload_req.name, "Certificate name");

    enter(stage, Stage::Uploading);
    let certificate_id = api.upload_certificate(&upload_req).await?;
    info!(cert_id = %certificate_id, "Certificate uploaded");

    enter(stage, Stage::Configuring);
    info!(domain, "Configuring domain with the new certificate");
    let conf_req = DomainHttpsConfRequest::forcing_https(&certificate_id.0);
    let domain_response = api.configure_domain_https(domain, &conf_req).await?;
    info!(domain, "Domain certificate configured");

    Ok(Completed {
        certificate_id,
        domain_response,
    })
}

fn enter(stage: &mut Stage, next: Stage) {
    info!(from = %stage, to = %next, "Stage");
    *stage = next;
}
