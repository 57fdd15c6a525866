use clap::Parser;
use log::error;

mod auth;
mod config;
mod error;
mod mastodon;
mod remote;
mod run;
mod status;
mod store;

use crate::auth::Prompt;
use crate::config::{Args, Config};
use crate::error::Result;
use crate::mastodon::client::Mastodon;
use crate::remote::git::GitRemote;

fn drive(config: &Config) -> Result<()> {
    let service = Mastodon::new()?;
    let mut prompt = Prompt {
        input: std::io::stdin().lock(),
        output: std::io::stdout(),
    };

    // Check once, or forever every N seconds
    run::drive(config, &GitRemote, &service, &mut prompt, |interval| {
        std::thread::sleep(interval);
        true
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = Config::try_from(Args::parse()).and_then(|config| drive(&config));
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
