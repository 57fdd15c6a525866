//! Thin blocking client for the parts of the Mastodon API git2mastodon needs:
//! registering an application, exchanging an authorization code for a token,
//! and posting a status.
pub mod client;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::CredentialRecord;

pub const CLIENT_NAME: &str = "git2mastodon";
pub const WEBSITE: &str = "https://get.cutie.cafe/git2mastodon";
pub const SCOPES: &str = "read write";
/// Out-of-band redirect: the instance shows the code instead of redirecting
pub const OOB_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Client credentials issued when registering an application
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Statuses are always posted unlisted: visible by link, kept off public timelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Unlisted,
}

/// A status ready to be submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toot {
    pub status: String,
    pub visibility: Visibility,
}

/// The parts of the instance's answer to a posted status we care about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostedStatus {
    pub id: String,
    pub url: Option<String>,
}

pub(crate) trait SocialService {
    /// Register a new application with the instance at `server`
    fn register_app(&self, server: &str) -> Result<AppCredentials>;
    /// Trade an authorization code for a user access token
    fn exchange_code(&self, server: &str, app: &AppCredentials, code: &str) -> Result<String>;
    /// Post `toot` as the user the record's access token belongs to
    fn post_status(&self, record: &CredentialRecord, toot: &Toot) -> Result<PostedStatus>;
}
