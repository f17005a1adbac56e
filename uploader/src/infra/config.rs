use std::{env, path::PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use qiniu_cert_shared::signature::Credentials;
use reqwest::Url;

const ACCESS_KEY_ENV_KEYS: [&str; 2] = ["ACCESS_KEY", "QINIU_ACCESS_KEY"];
const SECRET_KEY_ENV_KEYS: [&str; 2] = ["SECRET_KEY", "QINIU_SECRET_KEY"];
const DOMAIN_ENV_KEY: &str = "DOMAIN";
const CERT_PATH_ENV_KEY: &str = "CERT_PATH";
const KEY_PATH_ENV_KEY: &str = "KEY_PATH";
const API_URL_ENV_KEY: &str = "QINIU_API_URL";

const DEFAULT_CERT_PATH: &str = "./cert.pem";
const DEFAULT_KEY_PATH: &str = "./key.pem";
const DEFAULT_API_URL: &str = "https://api.qiniu.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub domain_settings: DomainSettings,
    pub certificate_file_settings: CertificateFileSettings,
    pub api_settings: ApiSettings,
    /// UTC date used to name the uploaded certificate.
    pub today: NaiveDate,
}

#[derive(Clone, Debug)]
pub struct DomainSettings {
    pub domain: String,
}

#[derive(Clone, Debug)]
pub struct CertificateFileSettings {
    pub certificate_path: PathBuf,
    pub private_key_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct ApiSettings {
    pub base_url: Url,
    /// Value of the `Host` header, which is also what gets signed.
    pub host: String,
}

impl ApiSettings {
    pub fn from_url(raw: &str) -> Result<ApiSettings, anyhow::Error> {
        let base_url = Url::parse(raw).with_context(|| format!("[{raw}] is not a valid URL"))?;
        let host_name = base_url
            .host_str()
            .with_context(|| format!("[{raw}] has no host"))?;
        let host = match base_url.port() {
            Some(port) => format!("{host_name}:{port}"),
            None => host_name.to_string(),
        };
        Ok(ApiSettings { base_url, host })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

impl Config {
    pub fn load_env() -> Result<Config, anyhow::Error> {
        Config::load(|key| env::var(key).ok(), Utc::now().date_naive())
    }

    /// Builds the config from any key lookup; unset and empty values are treated alike.
    pub fn load<F>(lookup: F, today: NaiveDate) -> Result<Config, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup_non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let first_of = |keys: &[&str]| keys.iter().find_map(|key| lookup_non_empty(key));

        let access_key = first_of(&ACCESS_KEY_ENV_KEYS)
            .with_context(|| format!("Expected one of {ACCESS_KEY_ENV_KEYS:?} to be defined"))?;
        let secret_key = first_of(&SECRET_KEY_ENV_KEYS)
            .with_context(|| format!("Expected one of {SECRET_KEY_ENV_KEYS:?} to be defined"))?;
        let credentials = Credentials {
            access_key,
            secret_key,
        };

        let domain = lookup_non_empty(DOMAIN_ENV_KEY)
            .with_context(|| format!("Expected {DOMAIN_ENV_KEY} to be defined"))?;
        let domain_settings = DomainSettings { domain };

        let certificate_file_settings = CertificateFileSettings {
            certificate_path: lookup_non_empty(CERT_PATH_ENV_KEY)
                .unwrap_or_else(|| DEFAULT_CERT_PATH.to_string())
                .into(),
            private_key_path: lookup_non_empty(KEY_PATH_ENV_KEY)
                .unwrap_or_else(|| DEFAULT_KEY_PATH.to_string())
                .into(),
        };

        let api_url =
            lookup_non_empty(API_URL_ENV_KEY).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_settings = ApiSettings::from_url(&api_url)
            .with_context(|| format!("Invalid {API_URL_ENV_KEY}"))?;

        Ok(Config {
            credentials,
            domain_settings,
            certificate_file_settings,
            api_settings,
            today,
        })
    }
}
