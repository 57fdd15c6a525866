use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::error::{Error, Result};

/// Announce new commits of a git repository on Mastodon
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The repository to fetch
    #[arg(short, long)]
    repo: Option<String>,

    /// The refspec to compare commits with
    #[arg(long, default_value = "refs/heads/master")]
    refspec: String,

    /// The Mastodon (or Mastodon-compatible) instance to interface with (only
    /// required on first run)
    #[arg(long, default_value = "https://mastodon.social")]
    instance: String,

    /// File to store settings/data in
    #[arg(long, default_value = "masto.cfg")]
    storage: PathBuf,

    /// Post a commit again even if it's already been posted
    #[arg(short, long)]
    force: bool,

    /// A tera template used to render the status to post. `{{ repository }}`
    /// and `{{ commit }}` are available
    #[arg(long, value_name = "PATH")]
    tmpl: Option<PathBuf>,

    /// If > 0, run in the foreground and check every N seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 0)]
    run_every: u64,
}

/// Validated settings for a check-and-notify pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub repo: String,
    pub refspec: String,
    pub instance: String,
    pub storage: PathBuf,
    pub force: bool,
    pub tmpl: Option<PathBuf>,
    /// `None` runs a single pass
    pub run_every: Option<Duration>,
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self> {
        let repo = args
            .repo
            .filter(|r| !r.trim().is_empty())
            .ok_or(Error::MissingRepo)?;

        Url::parse(&args.instance).map_err(|e| Error::InvalidInstance(args.instance.clone(), e))?;

        Ok(Self {
            repo,
            refspec: args.refspec,
            instance: args.instance,
            storage: args.storage,
            force: args.force,
            tmpl: args.tmpl,
            run_every: (args.run_every > 0).then(|| Duration::from_secs(args.run_every)),
        })
    }
}
