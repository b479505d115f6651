use std::sync::{Arc, RwLock};

use reqwest::Url;
use reqwest::blocking::RequestBuilder;
use reqwest_cookie_store::{CookieStore, CookieStoreRwLock};

pub mod error;
pub mod session;
pub mod albums;
pub mod photos;

use error::{ApiClientError, RequestError};

pub const XSRF_COOKIE: &str = "XSRF-TOKEN";
pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";

pub struct Info {
    pub url: Url
}

pub struct ApiClient {
    pub(crate) store: Arc<CookieStoreRwLock>,
    pub(crate) client: reqwest::blocking::Client,
    pub(crate) xsrf: RwLock<Option<String>>,
    pub(crate) info: Info
}

impl ApiClient {
    pub fn builder<U>(url: U) -> Result<ApiClientBuilder, ApiClientError>
    where
        U: AsRef<str>
    {
        let mut url = Url::parse(url.as_ref())
            .map_err(ApiClientError::Url)?;

        // relative endpoints must land under the configured path
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(ApiClientBuilder {
            url,
            agent: None
        })
    }

    pub fn url(&self) -> &Url {
        &self.info.url
    }

    fn endpoint<U>(&self, path: U) -> Result<Url, RequestError>
    where
        U: AsRef<str>
    {
        self.info.url.join(path.as_ref().trim_start_matches('/'))
            .map_err(RequestError::Url)
    }

    fn with_session(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiClientError> {
        let builder = builder.header(reqwest::header::ACCEPT, "application/json");
        let guard = self.xsrf.read()
            .map_err(|_e| ApiClientError::PoisonedLock)?;

        if let Some(token) = guard.as_ref() {
            return Ok(builder.header(XSRF_HEADER, token.as_str()));
        }

        Ok(builder)
    }

    pub(crate) fn get<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>,
    {
        let url = self.endpoint(path)?;

        Ok(self.with_session(self.client.get(url))?)
    }

    pub(crate) fn post<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        let url = self.endpoint(path)?;

        Ok(self.with_session(self.client.post(url))?)
    }

    /// pulls the xsrf token out of the cookie store so it can be echoed back
    /// as a header. returns false if the server did not set one
    pub(crate) fn refresh_xsrf(&self) -> Result<bool, ApiClientError> {
        let token = {
            let store = self.store.read()
                .map_err(|_e| ApiClientError::PoisonedLock)?;

            let token = store.iter_unexpired()
                .find(|cookie| cookie.name() == XSRF_COOKIE)
                .map(|cookie| decode_cookie(cookie.value()));

            token
        };

        let found = token.is_some();
        let mut xsrf = self.xsrf.write()
            .map_err(|_e| ApiClientError::PoisonedLock)?;

        *xsrf = token;

        Ok(found)
    }
}

fn decode_cookie(value: &str) -> String {
    url::form_urlencoded::parse(format!("v={value}").as_bytes())
        .find(|(key, _)| key == "v")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| value.to_owned())
}

pub struct ApiClientBuilder {
    url: Url,
    agent: Option<String>
}

impl ApiClientBuilder {
    pub fn user_agent<U>(&mut self, user_agent: U)
    where
        U: Into<String>
    {
        self.agent = Some(user_agent.into());
    }

    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let user_agent = self.agent.unwrap_or("lfs-api-client/0.1.0".into());
        let store = Arc::new(CookieStoreRwLock::new(CookieStore::default()));
        let client = reqwest::blocking::Client::builder()
            .cookie_provider(store.clone())
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiClientError::Reqwest(e))?;

        Ok(ApiClient {
            store,
            client,
            xsrf: RwLock::new(None),
            info: Info {
                url: self.url
            }
        })
    }
}
