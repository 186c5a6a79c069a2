use anyhow::{Context, Result};
use clap::Parser;
use retag::{
    distribution::Client, ClientConfig, MissingSource, RetagOptions, RetagOutcome, TagSpec,
    TransportMode,
};
use std::{path::PathBuf, time::Duration};

/// Publish the manifest of an existing tag under a new tag in the same repository
#[derive(Debug, Parser)]
#[command(version)]
struct Opt {
    /// The existing image tag, e.g. `reg.example.com/ns/img:v1`
    #[arg(long = "from-tag")]
    from_tag: String,

    /// The new image tag - must have the same registry and repo
    #[arg(long = "to-tag")]
    to_tag: String,

    /// Path to the Docker registry config.json, used to obtain login credentials.
    /// Defaults to `$DOCKER_CONFIG/config.json` or `~/.docker/config.json`.
    #[arg(long = "docker-config")]
    docker_config: Option<PathBuf>,

    /// Use a http connection to the registry
    #[arg(long)]
    insecure: bool,

    /// Timeout of each request to the registry in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Only warn and exit successfully when the source tag does not exist
    #[arg(long)]
    allow_missing_source: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();
    let from = TagSpec::parse(&opt.from_tag).context("failed to parse from-tag")?;
    let to = TagSpec::parse(&opt.to_tag).context("failed to parse to-tag")?;
    let request = retag::RetagRequest::new(from, to)?;

    let config = ClientConfig {
        timeout: opt.timeout.map(Duration::from_secs),
        docker_config: opt.docker_config,
    };
    match &config.docker_config {
        Some(path) => log::info!("using credentials in {}", path.display()),
        None => log::info!(
            "using credentials in {}",
            retag::config::default_docker_config()?.display()
        ),
    }
    let mut client = Client::new(&config)?;

    let options = RetagOptions {
        transport: TransportMode::from_insecure(opt.insecure),
        missing_source: if opt.allow_missing_source {
            MissingSource::Warn
        } else {
            MissingSource::Fail
        },
    };
    match retag::retag(&request, &options, &mut client)? {
        RetagOutcome::Retagged { digest } => println!("{}", digest),
        RetagOutcome::SourceMissing => {}
    }
    Ok(())
}
