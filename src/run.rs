use std::io::{BufRead, Write};
use std::time::Duration;

use log::info;

use crate::auth::{self, Prompt};
use crate::config::Config;
use crate::error::Result;
use crate::mastodon::{PostedStatus, SocialService};
use crate::remote::{self, Remote};
use crate::status::{self, TemplateInput};
use crate::store;

/// How a pass ended when nothing went wrong
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The remote has no ref named like the configured refspec
    NoMatchingRef,
    /// The commit was announced by an earlier run
    AlreadyAnnounced(String),
    Posted(PostedStatus),
}

/// One check-and-notify pass: look up the ref, authorize if needed, post
pub(crate) fn run<G, S, R, W>(
    config: &Config,
    remote: &G,
    service: &S,
    prompt: &mut Prompt<R, W>,
) -> Result<Outcome>
where
    G: Remote,
    S: SocialService,
    R: BufRead,
    W: Write,
{
    let refs = remote.list(&config.repo)?;
    let Some(commit) = remote::find_ref(&refs, &config.refspec) else {
        info!("No commits matching refspec {}", config.refspec);
        return Ok(Outcome::NoMatchingRef);
    };

    let mut record = match store::load(&config.storage)? {
        Some(record) => record,
        None => {
            let record = auth::authorize(service, &config.instance, prompt)?;
            store::save(&config.storage, &record)?;
            info!("Credentials saved to {}", config.storage.display());
            record
        }
    };

    if record.last_commit == commit && !config.force {
        info!("Commit {} has already been announced", commit);
        return Ok(Outcome::AlreadyAnnounced(commit));
    }

    let input = TemplateInput {
        commit: &commit,
        repository: &config.repo,
    };
    let message = status::compose(config.tmpl.as_deref(), &input)?;

    let posted = status::announce(service, &config.storage, &mut record, &commit, message)?;
    Ok(Outcome::Posted(posted))
}

/// Run passes until one fails, or just one when no interval is configured
///
/// `pause` is handed the interval between passes; returning `false` from it
/// ends the loop.
pub(crate) fn drive<G, S, R, W, P>(
    config: &Config,
    remote: &G,
    service: &S,
    prompt: &mut Prompt<R, W>,
    mut pause: P,
) -> Result<()>
where
    G: Remote,
    S: SocialService,
    R: BufRead,
    W: Write,
    P: FnMut(Duration) -> bool,
{
    loop {
        run(config, remote, service, prompt)?;

        match config.run_every {
            Some(interval) if pause(interval) => continue,
            _ => return Ok(()),
        }
    }
}
