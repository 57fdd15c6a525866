use log::{debug, trace};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::mastodon::{
    AppCredentials, PostedStatus, SocialService, Toot, CLIENT_NAME, OOB_REDIRECT, SCOPES,
    WEBSITE,
};
use crate::store::CredentialRecord;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug)]
pub struct Mastodon {
    client: Client,
}

impl Mastodon {
    pub fn new() -> Result<Self> {
        let user_agent = format!("{}/{}", CLIENT_NAME, env!("CARGO_PKG_VERSION"));
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

/// Resolve an API path against the instance base URL
pub(crate) fn endpoint(server: &str, path: &str) -> Result<Url> {
    let mut base = Url::parse(server)?;
    // Keep any path prefix the instance is mounted under
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

/// Turn non-2xx answers into an error carrying the instance's explanation
fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(Error::ApiStatus { status, body })
}

impl SocialService for Mastodon {
    fn register_app(&self, server: &str) -> Result<AppCredentials> {
        let url = endpoint(server, "api/v1/apps")?;
        trace!("request url={}", &url);
        let response = self
            .client
            .post(url)
            .form(&[
                ("client_name", CLIENT_NAME),
                ("redirect_uris", OOB_REDIRECT),
                ("scopes", SCOPES),
                ("website", WEBSITE),
            ])
            .send()?;

        let app: AppCredentials = check(response)?.json()?;
        debug!("registered app with client id {}", app.client_id);
        Ok(app)
    }

    fn exchange_code(&self, server: &str, app: &AppCredentials, code: &str) -> Result<String> {
        let url = endpoint(server, "oauth/token")?;
        trace!("request url={}", &url);
        let response = self
            .client
            .post(url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", app.client_id.as_str()),
                ("client_secret", app.client_secret.as_str()),
                ("redirect_uri", OOB_REDIRECT),
                ("scope", SCOPES),
                ("code", code),
            ])
            .send()?;

        let token: TokenResponse = check(response)?.json()?;
        Ok(token.access_token)
    }

    fn post_status(&self, record: &CredentialRecord, toot: &Toot) -> Result<PostedStatus> {
        let url = endpoint(&record.server, "api/v1/statuses")?;
        trace!("request url={}", &url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&record.access_token)
            .json(toot)
            .send()?;

        Ok(check(response)?.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mastodon::Visibility;

    #[test]
    fn endpoint_joins_root_instance() {
        assert_eq!(
            endpoint("https://mastodon.social", "api/v1/apps")
                .unwrap()
                .as_str(),
            "https://mastodon.social/api/v1/apps"
        );
        assert_eq!(
            endpoint("https://mastodon.social/", "/oauth/token")
                .unwrap()
                .as_str(),
            "https://mastodon.social/oauth/token"
        );
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        assert_eq!(
            endpoint("https://example.org/social", "api/v1/statuses")
                .unwrap()
                .as_str(),
            "https://example.org/social/api/v1/statuses"
        );
    }

    #[test]
    fn endpoint_rejects_garbage() {
        assert!(matches!(
            endpoint("not a url", "api/v1/apps"),
            Err(Error::Url(_))
        ));
    }

    #[test]
    fn toot_serializes_visibility_lowercase() {
        let toot = Toot {
            status: "hello".to_string(),
            visibility: Visibility::Unlisted,
        };
        assert_eq!(
            serde_json::to_value(&toot).unwrap(),
            serde_json::json!({"status": "hello", "visibility": "unlisted"})
        );
    }

    #[test]
    fn posted_status_tolerates_missing_url() {
        let posted: PostedStatus =
            serde_json::from_str(r#"{"id":"109","url":null,"content":"<p>hi</p>"}"#).unwrap();
        assert_eq!(posted.id, "109");
        assert_eq!(posted.url, None);
    }
}
