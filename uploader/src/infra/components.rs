use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use super::{config::Config, errors::AppError};
use crate::api::qiniu::QiniuClient;

#[derive(Clone)]
pub struct AppComponents {
    pub config: Config,
    pub qiniu_client: QiniuClient,
}

impl AppComponents {
    pub fn create(config: Config) -> Result<AppComponents, AppError> {
        let qiniu_client = QiniuClient::new(
            http_client()?,
            config.credentials.clone(),
            config.api_settings.clone(),
        );
        Ok(AppComponents {
            config,
            qiniu_client,
        })
    }
}

// No timeout: each call waits until the server answers or the connection fails.
fn http_client() -> Result<ClientWithMiddleware, AppError> {
    let client = Client::builder().build()?;
    Ok(ClientBuilder::new(client)
        .with(TracingMiddleware::default())
        .build())
}
