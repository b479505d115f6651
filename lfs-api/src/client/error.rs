use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ApiClientError {
    PoisonedLock,
    Url(url::ParseError),
    Reqwest(reqwest::Error),
}

impl fmt::Display for ApiClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiClientError::PoisonedLock => write!(f, "ApiClientError::PoisonedLock"),
            ApiClientError::Url(_) => write!(f, "ApiClientError::Url"),
            ApiClientError::Reqwest(_) => write!(f, "ApiClientError::Reqwest"),
        }
    }
}

impl Error for ApiClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiClientError::Url(v) => Some(v),
            ApiClientError::Reqwest(v) => Some(v),
            _ => None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("server responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("server rejected the provided credentials")]
    Unauthenticated,

    #[error("invalid endpoint url")]
    Url(#[source] url::ParseError),

    #[error(transparent)]
    Client(#[from] ApiClientError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error)
}

impl RequestError {
    /// reads the body of a failed response into an error
    pub(crate) fn from_response(res: reqwest::blocking::Response) -> Self {
        let status = res.status();
        let body = res.text().unwrap_or_default();

        RequestError::Status { status, body }
    }
}
