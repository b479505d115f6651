use serde::Serialize;

use crate::client::error::RequestError;
use crate::client::ApiClient;

/// opens a session with the server. the server hands out an xsrf cookie that
/// every following request has to echo back
pub struct Init;

impl Init {
    pub fn send(self, client: &ApiClient) -> Result<bool, RequestError> {
        let res = client.get("")?.send()?;

        if !res.status().is_success() {
            return Err(RequestError::from_response(res));
        }

        Ok(client.refresh_xsrf()?)
    }
}

#[derive(Serialize)]
struct LoginBody {
    username: String,
    password: String,
}

pub struct Login {
    body: LoginBody
}

impl Login {
    pub fn new<U, P>(username: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        Login {
            body: LoginBody {
                username: username.into(),
                password: password.into()
            }
        }
    }

    pub fn send(self, client: &ApiClient) -> Result<(), RequestError> {
        let res = client.post("api/Session::login")?
            .json(&self.body)
            .send()?;

        match res.status() {
            reqwest::StatusCode::OK |
            reqwest::StatusCode::NO_CONTENT => {
                // the token is rotated once logged in
                client.refresh_xsrf()?;

                Ok(())
            },
            reqwest::StatusCode::UNAUTHORIZED |
            reqwest::StatusCode::FORBIDDEN => Err(RequestError::Unauthenticated),
            _ => Err(RequestError::from_response(res))
        }
    }
}
