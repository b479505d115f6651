use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lfs_lib::quality::Quality;

use crate::error::{self, Context};
use crate::fs::FsError;

pub mod file;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// config file to load, yaml or json
    #[arg(long, default_value = "settings.yaml")]
    pub config: PathBuf,

    /// name of the instance to use, defaults to the first one listed
    #[arg(long)]
    pub instance: Option<String>,

    /// quality tier photos are served at
    #[arg(long)]
    pub quality: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// crawls the gallery and mounts it read only
    #[cfg(feature = "fuse")]
    Mount {
        mountpoint: PathBuf,

        /// let other users access the mount
        #[arg(long)]
        allow_other: bool,
    },

    /// crawls the gallery and prints the resulting tree
    Tree,
}

#[derive(Debug, Clone)]
pub struct Login {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub url: String,
    pub login: Option<Login>,
    pub quality: Quality,
}

#[derive(Debug)]
pub struct Config {
    pub instance: Instance,
    pub command: Command,
}

impl Config {
    pub fn from_args(args: CliArgs) -> error::Result<Self> {
        let path = if args.config.is_absolute() {
            args.config.clone()
        } else {
            let cwd = std::env::current_dir()
                .context("failed to retrieve cwd for config file")?;

            cwd.join(&args.config)
        };

        tracing::debug!("loading config file \"{}\"", path.display());

        let settings = file::Settings::load(&path)?;

        Self::resolve(settings, args)
    }

    /// picks the requested instance and settles its values. the quality tier
    /// given on the command line wins over the one in the file
    pub fn resolve(settings: file::Settings, args: CliArgs) -> error::Result<Self> {
        let mut found = None;

        for (index, given) in settings.instances.into_iter().enumerate() {
            let name = given.name.clone()
                .unwrap_or_else(|| index.to_string());

            let matches = match &args.instance {
                Some(wanted) => *wanted == name,
                None => true,
            };

            if matches {
                found = Some((name, given));
                break;
            }
        }

        let (name, given) = match (found, &args.instance) {
            (Some(found), _) => found,
            (None, Some(wanted)) => return Err(error::Error::new()
                .kind("InvalidConfig")
                .message(format!("instance \"{wanted}\" was not found"))),
            (None, None) => return Err(error::Error::new()
                .kind("InvalidConfig")
                .message("no instances have been specified")),
        };

        let quality = match args.quality.as_ref().or(given.quality.as_ref()) {
            Some(tier) => Quality::parse(tier).map_err(FsError::from)?,
            None => Quality::default(),
        };

        let login = match (given.user, given.password) {
            (Some(user), Some(password)) => Some(Login { user, password }),
            (Some(user), None) => {
                tracing::warn!("instance \"{name}\" has user \"{user}\" but no password, continuing without login");

                None
            },
            (None, Some(_)) => {
                tracing::warn!("instance \"{name}\" has a password but no user, continuing without login");

                None
            },
            (None, None) => None,
        };

        if given.url.is_empty() {
            return Err(error::Error::new()
                .kind("InvalidConfig")
                .message(format!("instance \"{name}\" has an empty url")));
        }

        let instance = Instance {
            name,
            url: given.url,
            login,
            quality,
        };

        tracing::debug!("{instance:#?}");

        Ok(Config {
            instance,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::file::{Format, Settings};

    const YAML: &str = r#"
instances:
  - name: home
    url: https://photos.example.com
    user: admin
    password: secret
    quality: medium
  - name: public
    url: https://gallery.example.com/lychee
"#;

    fn args(list: &[&str]) -> CliArgs {
        let mut given = vec!["lfs"];
        given.extend_from_slice(list);
        given.push("tree");

        CliArgs::parse_from(given)
    }

    #[test]
    fn first_instance_by_default() {
        let settings = Settings::parse(Format::Yaml, YAML).unwrap();
        let config = Config::resolve(settings, args(&[])).unwrap();

        assert_eq!(config.instance.name, "home");
        assert_eq!(config.instance.quality, Quality::Medium);

        let login = config.instance.login.unwrap();

        assert_eq!(login.user, "admin");
        assert_eq!(login.password, "secret");
    }

    #[test]
    fn named_instance() {
        let settings = Settings::parse(Format::Yaml, YAML).unwrap();
        let config = Config::resolve(settings, args(&["--instance", "public"])).unwrap();

        assert_eq!(config.instance.url, "https://gallery.example.com/lychee");
        assert_eq!(config.instance.quality, Quality::Full);
        assert!(config.instance.login.is_none());
    }

    #[test]
    fn cli_quality_wins() {
        let settings = Settings::parse(Format::Yaml, YAML).unwrap();
        let config = Config::resolve(settings, args(&["--quality", "thumb"])).unwrap();

        assert_eq!(config.instance.quality, Quality::Thumbnail);
    }

    #[test]
    fn invalid_quality() {
        let settings = Settings::parse(Format::Yaml, YAML).unwrap();

        assert!(Config::resolve(settings, args(&["--quality", "huge"])).is_err());
    }

    #[test]
    fn missing_instance() {
        let settings = Settings::parse(Format::Yaml, YAML).unwrap();

        assert!(Config::resolve(settings, args(&["--instance", "work"])).is_err());

        let settings = Settings::parse(Format::Json, r#"{"instances": []}"#).unwrap();

        assert!(Config::resolve(settings, args(&[])).is_err());
    }

    #[test]
    fn json_instances() {
        let settings = Settings::parse(
            Format::Json,
            r#"{"instances": [{"url": "https://photos.example.com", "user": "admin"}]}"#
        ).unwrap();
        let config = Config::resolve(settings, args(&["--instance", "0"])).unwrap();

        assert_eq!(config.instance.name, "0");
        assert!(config.instance.login.is_none());
    }

    #[test]
    fn formats_by_extension() {
        assert_eq!(Format::from_path("settings.yaml".as_ref()).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path("settings.YML".as_ref()).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path("settings.json".as_ref()).unwrap(), Format::Json);
        assert!(Format::from_path("settings.toml".as_ref()).is_err());
        assert!(Format::from_path("settings".as_ref()).is_err());
    }
}
