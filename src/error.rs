use lfs_lib::context_trait;

use crate::fs::error::BoxDynError;

#[derive(Debug)]
pub struct Error {
    kind: String,
    msg: Option<String>,
    src: Option<BoxDynError>,
}

pub type Result<T = ()> = std::result::Result<T, Error>;

impl Error {
    pub fn new() -> Error {
        Error {
            kind: String::from("Error"),
            msg: None,
            src: None,
        }
    }

    pub fn kind<K>(mut self, kind: K) -> Self
    where
        K: Into<String>
    {
        self.kind = kind.into();
        self
    }

    pub fn message<M>(mut self, msg: M) -> Error
    where
        M: Into<String>
    {
        self.msg = Some(msg.into());
        self
    }

    pub fn source<S>(mut self, src: S) -> Error
    where
        S: Into<BoxDynError>
    {
        self.src = Some(src.into());
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(msg) = &self.msg {
            write!(f, ": {msg}")?;
        }

        let mut next = self.src.as_ref().map(|v| &**v as &(dyn std::error::Error + 'static));

        while let Some(err) = next {
            write!(f, "\n    {err}")?;

            next = err.source();
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.src.as_ref().map(|v| & **v as _)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::new()
            .message(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::new()
            .message(msg)
    }
}

macro_rules! generic_catch {
    ($k:expr, $e:path) => {
        impl From<$e> for Error {
            fn from(err: $e) -> Self {
                Error::new()
                    .kind($k)
                    .source(err)
            }
        }
    };
    ($k:expr, $e:path, $m:expr) => {
        impl From<$e> for Error {
            fn from(err: $e) -> Self {
                Error::new()
                    .kind($k)
                    .message($m)
                    .source(err)
            }
        }
    }
}

generic_catch!("IoError", std::io::Error);
generic_catch!("JsonError", serde_json::Error);
generic_catch!("YamlError", serde_yaml::Error);
generic_catch!("FsError", crate::fs::FsError);
generic_catch!("InvalidQuality", lfs_lib::quality::InvalidQuality);
generic_catch!("ApiClientError", lfs_api::client::error::ApiClientError);
generic_catch!("RequestError", lfs_api::client::error::RequestError);

context_trait!(Error);

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<BoxDynError>
{
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        match self {
            Ok(v) => Ok(v),
            Err(err) => Err(Error::new()
                .message(cxt)
                .source(err))
        }
    }
}

impl<T> Context<T, ()> for std::option::Option<T> {
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        match self {
            Some(v) => Ok(v),
            None => Err(Error::new()
                .message(cxt))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_walks_sources() {
        let err: Result<()> = Err(crate::fs::FsError::NotFound(String::from("/missing")))
            .context("failed to stat");

        let msg = err.unwrap_err().to_string();

        assert_eq!(msg, "Error: failed to stat\n    \"/missing\" does not exist");
    }

    #[test]
    fn option_context() {
        let err = None::<u8>.context("nothing here").unwrap_err();

        assert_eq!(err.to_string(), "Error: nothing here");
    }
}
