use std::path::Path;

use serde::Deserialize;

use crate::error::{self, Context};

#[derive(Debug, Deserialize)]
pub struct Instance {
    pub name: Option<String>,
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub quality: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> error::Result<Self> {
        let ext = path.extension().context(format!(
            "failed to retrieve the file extension for config file: \"{}\"", path.display()
        ))?;

        let ext = ext.to_ascii_lowercase();

        if ext.eq("yaml") || ext.eq("yml") {
            Ok(Format::Yaml)
        } else if ext.eq("json") {
            Ok(Format::Json)
        } else {
            Err(error::Error::new().message(format!(
                "unknown type of config file: \"{}\"", path.display()
            )))
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> error::Result<Self> {
        let format = Format::from_path(path)?;
        let file = std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .context(format!("failed to open config file: \"{}\"", path.display()))?;
        let reader = std::io::BufReader::new(file);

        match format {
            Format::Yaml => serde_yaml::from_reader(reader).context(format!(
                "failed to parse yaml config file: \"{}\"", path.display()
            )),
            Format::Json => serde_json::from_reader(reader).context(format!(
                "failed to parse json config file: \"{}\"", path.display()
            )),
        }
    }

    pub fn parse(format: Format, given: &str) -> error::Result<Self> {
        match format {
            Format::Yaml => Ok(serde_yaml::from_str(given)?),
            Format::Json => Ok(serde_json::from_str(given)?),
        }
    }
}
