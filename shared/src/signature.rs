use std::fmt;

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

/// Scheme name prefixed to every Qiniu management token.
pub const TOKEN_SCHEME: &str = "Qiniu";

/// Requests with this content type never have their body signed.
pub const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Everything about an outgoing management API request that goes into its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest<'a> {
    pub method: &'a str,
    pub url_path: &'a str,
    pub host: &'a str,
    pub content_type: &'a str,
    pub body: &'a str,
}

impl SignRequest<'_> {
    /// The exact text Qiniu's verifier hashes:
    ///
    /// ```text
    /// <METHOD> <PATH>
    /// Host: <HOST>
    /// Content-Type: <CONTENT_TYPE>
    ///
    /// <BODY>
    /// ```
    ///
    /// The body is left out when empty or when the content type is
    /// `application/octet-stream`; the blank line is always there.
    pub fn canonical_string(&self) -> String {
        let method = self.method.to_uppercase();
        let mut canonical = format!(
            "{method} {}\nHost: {}\nContent-Type: {}\n\n",
            self.url_path, self.host, self.content_type
        );
        if !self.body.is_empty() && self.content_type != OCTET_STREAM_CONTENT_TYPE {
            canonical.push_str(self.body);
        }
        canonical
    }
}

/// A signed request: the canonical string that was hashed and the header value to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub canonical_string: String,
    pub signature: String,
    pub authorization: String,
}

pub fn make_url_safe_base64_hash(secret: &str, message: &str) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::CouldNotUseKey)?;

    mac.update(message.as_bytes());

    let result = mac.finalize();
    let result_bytes = result.into_bytes();

    Ok(URL_SAFE.encode(result_bytes))
}

pub fn sign_request(
    credentials: &Credentials,
    request: &SignRequest<'_>,
) -> Result<SignedRequest, SignatureError> {
    let canonical_string = request.canonical_string();
    let signature = make_url_safe_base64_hash(&credentials.secret_key, &canonical_string)?;
    let authorization = format!("{TOKEN_SCHEME} {}:{signature}", credentials.access_key);
    Ok(SignedRequest {
        canonical_string,
        signature,
        authorization,
    })
}

/// Builds the `Authorization` header value, `Qiniu <access_key>:<signature>`.
pub fn make_authorization_token(
    credentials: &Credentials,
    request: &SignRequest<'_>,
) -> Result<String, SignatureError> {
    sign_request(credentials, request).map(|signed| signed.authorization)
}

/// Checks a received `Authorization` value against the request it claims to sign.
pub fn ensure_token_is_valid_for_request(
    credentials: &Credentials,
    request: &SignRequest<'_>,
    token_to_check: &str,
) -> Result<(), SignatureError> {
    let signature_to_check = token_to_check
        .strip_prefix(TOKEN_SCHEME)
        .and_then(|rest| rest.strip_prefix(' '))
        .and_then(|rest| rest.strip_prefix(credentials.access_key.as_str()))
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or(SignatureError::MalformedToken)?;

    let signature_to_check_as_bytes = URL_SAFE
        .decode(signature_to_check.as_bytes())
        .map_err(|_| SignatureError::BadSignature)?;

    let mut mac = HmacSha1::new_from_slice(credentials.secret_key.as_bytes())
        .map_err(|_| SignatureError::CouldNotUseKey)?;

    mac.update(request.canonical_string().as_bytes());

    mac.verify_slice(&signature_to_check_as_bytes)
        .map_err(|_| SignatureError::BadSignature)
}

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Bad signature received; it did not pass the check.")]
    BadSignature,
    #[error("Token is not of the form `Qiniu <access_key>:<signature>` for this access key.")]
    MalformedToken,
    #[error("The secret key could not be used.")]
    CouldNotUseKey,
}
