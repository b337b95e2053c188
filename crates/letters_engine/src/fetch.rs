use std::time::Duration;

use letters_logging::{letters_debug, letters_info};
use reqwest::header::{HeaderMap, CONTENT_TYPE, SET_COOKIE};
use reqwest::{Method, Url};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::map_reqwest_error;
use crate::{
    ApiError, Credential, LetterRecord, LetterSubmission, LoginGrant, PageRequest,
    ReportSubmission,
};

const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Server root; API paths are resolved against it.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Fetches one page of letters.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Resolves with the page, or `ApiError::Cancelled` once `cancel` fires.
    async fn fetch_page(
        &self,
        request: &PageRequest,
        auth: Option<&Credential>,
        cancel: &CancellationToken,
    ) -> Result<Vec<LetterRecord>, ApiError>;
}

/// reqwest client for the letters API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn page_url(&self, request: &PageRequest) -> Result<Url, ApiError> {
        let mut url = self.endpoint(request.endpoint.path())?;
        // The first page is requested without a cursor.
        if request.offset > 0 {
            url.query_pairs_mut()
                .append_pair("offset", &request.offset.to_string());
        }
        Ok(url)
    }

    pub async fn availability(&self) -> Result<bool, ApiError> {
        #[derive(Deserialize)]
        struct Availability {
            available: bool,
        }

        let url = self.endpoint("api/available")?;
        let (_, body) = self.send(Method::GET, url, None, None).await?;
        let parsed: Availability =
            serde_json::from_slice(&body).map_err(|err| ApiError::Payload(err.to_string()))?;
        Ok(parsed.available)
    }

    pub async fn submit_letter(&self, letter: &LetterSubmission) -> Result<(), ApiError> {
        let url = self.endpoint("api/letters/post")?;
        let body = encode(letter)?;
        self.send(Method::POST, url, None, Some(body)).await?;
        letters_info!("[letters] letter submitted (secret = {})", letter.secret);
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, ApiError> {
        #[derive(serde::Serialize)]
        struct LoginBody<'a> {
            username: &'a str,
            password: &'a str,
        }
        #[derive(Deserialize, Default)]
        struct Privileges {
            #[serde(default)]
            moderator: bool,
            #[serde(default)]
            viewer: bool,
        }

        let url = self.endpoint("api/users/login")?;
        let body = encode(&LoginBody { username, password })?;
        let (headers, body) = self.send(Method::POST, url, None, Some(body)).await?;
        let privileges = if body.is_empty() {
            Privileges::default()
        } else {
            serde_json::from_slice(&body).map_err(|err| ApiError::Payload(err.to_string()))?
        };
        Ok(LoginGrant {
            moderator: privileges.moderator,
            viewer: privileges.viewer,
            token: cookie_value(&headers, TOKEN_COOKIE),
        })
    }

    pub async fn submit_report(&self, report: &ReportSubmission) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/letters/report/{}", report.letter_id))?;
        let body = encode(report)?;
        self.send(Method::POST, url, None, Some(body)).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        auth: Option<&Credential>,
        body: Option<Vec<u8>>,
    ) -> Result<(HeaderMap, Vec<u8>), ApiError> {
        letters_debug!("[letters] {} {}", method, url);
        let mut builder = self.client.request(method, url);
        if let Some(auth) = auth {
            builder = builder.bearer_auth(auth.token());
        }
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok((headers, body.to_vec()))
    }
}

#[async_trait::async_trait]
impl PageFetcher for ApiClient {
    async fn fetch_page(
        &self,
        request: &PageRequest,
        auth: Option<&Credential>,
        cancel: &CancellationToken,
    ) -> Result<Vec<LetterRecord>, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        let url = self.page_url(request)?;

        let fetch = async {
            let (_, body) = self.send(Method::GET, url, auth, None).await?;
            serde_json::from_slice::<Vec<LetterRecord>>(&body)
                .map_err(|err| ApiError::Payload(err.to_string()))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = fetch => result,
        }
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(value).map_err(|err| ApiError::Payload(err.to_string()))
}

/// Finds `name` among the response's `Set-Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
