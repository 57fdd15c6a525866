use std::cell::Cell;

use git2::{Cred, CredentialType, Direction, RemoteCallbacks};
use log::{debug, trace};

use crate::error::Result;
use crate::remote::{Remote, RemoteRef};

/// Lists refs through libgit2, talking to the remote directly (no local clone)
#[derive(Debug, Default)]
pub struct GitRemote;

fn callbacks<'a>(tried_agent: &'a Cell<bool>, tried_default: &'a Cell<bool>) -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();

    // libgit2 keeps asking while we keep returning credentials, so each method
    // is offered once
    callbacks.credentials(move |url, username_from_url, allowed_types| {
        trace!("credentials requested for {} ({:?})", url, allowed_types);
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) && !tried_agent.replace(true) {
            return Cred::ssh_key_from_agent(username);
        }

        if allowed_types.contains(CredentialType::DEFAULT) && !tried_default.replace(true) {
            return Cred::default();
        }

        Err(git2::Error::from_str("no authentication methods available"))
    });

    callbacks
}

impl Remote for GitRemote {
    fn list(&self, url: &str) -> Result<Vec<RemoteRef>> {
        let tried_agent = Cell::new(false);
        let tried_default = Cell::new(false);

        let mut remote = git2::Remote::create_detached(url)?;
        let connection = remote.connect_auth(
            Direction::Fetch,
            Some(callbacks(&tried_agent, &tried_default)),
            None,
        )?;

        let refs: Vec<RemoteRef> = connection
            .list()?
            .iter()
            .map(|head| RemoteRef {
                name: head.name().to_string(),
                hash: head.oid().to_string(),
            })
            .collect();
        debug!("{} advertised {} refs", url, refs.len());

        Ok(refs)
    }
}
