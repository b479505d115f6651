use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use lfs_api::client::ApiClient;
use lfs_api::client::session::{Init, Login};
use tracing_subscriber::{FmtSubscriber, EnvFilter};

mod error;
mod config;
mod fs;
#[cfg(feature = "fuse")]
mod bridge;

use error::Context;
use fs::{Filesystem, Kind};

fn main() {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .expect("failed to initialize global tracing subscriber");

    let args = config::CliArgs::parse();

    if let Err(err) = init(args) {
        tracing::error!("{err}");

        std::process::exit(1);
    }
}

fn init(args: config::CliArgs) -> error::Result {
    let config = config::Config::from_args(args)?;
    let client = connect(&config.instance)?;

    tracing::info!(
        "crawling \"{}\" at {} with photos at {}",
        config.instance.name,
        client.url(),
        config.instance.quality
    );

    let fs = Filesystem::crawl(Arc::new(client), config.instance.quality)
        .context("failed to crawl the gallery")?;

    match config.command {
        config::Command::Tree => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();

            print_tree(&fs, &mut out)
        },
        #[cfg(feature = "fuse")]
        config::Command::Mount { mountpoint, allow_other } => {
            bridge::mount(fs, &mountpoint, allow_other)
        }
    }
}

fn connect(instance: &config::Instance) -> error::Result<ApiClient> {
    let mut builder = ApiClient::builder(&instance.url)?;
    builder.user_agent(format!("lfs/{}", env!("CARGO_PKG_VERSION")));

    let client = builder.build()?;

    if !Init.send(&client).context("failed to open a session with the server")? {
        tracing::warn!("server did not hand out an xsrf token");
    }

    if let Some(login) = &instance.login {
        Login::new(&login.user, &login.password)
            .send(&client)
            .context(format!("failed to login as \"{}\"", login.user))?;

        tracing::info!("logged in as \"{}\"", login.user);
    }

    Ok(client)
}

fn print_tree<W>(fs: &Filesystem, out: &mut W) -> error::Result
where
    W: Write
{
    let root = fs.index().root_path();

    writeln!(out, "{root}")?;

    print_album(fs, out, root, 1)
}

fn print_album<W>(fs: &Filesystem, out: &mut W, path: &str, depth: usize) -> error::Result
where
    W: Write
{
    let indent = "  ".repeat(depth);

    for entry in fs.list(path)? {
        match entry.kind {
            Kind::Directory => {
                writeln!(out, "{indent}{}/", entry.name)?;

                print_album(fs, out, &entry.path, depth + 1)?;
            },
            Kind::RegularFile => {
                let attrs = fs.attributes(&entry.path)?;

                writeln!(
                    out,
                    "{indent}{} {} {}",
                    entry.name,
                    attrs.size,
                    attrs.mtime.format("%Y-%m-%d %H:%M:%S")
                )?;
            }
        }
    }

    Ok(())
}
