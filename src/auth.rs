use std::io::{BufRead, Write};

use log::{info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::mastodon::client::endpoint;
use crate::mastodon::{AppCredentials, SocialService, OOB_REDIRECT, SCOPES};
use crate::store::CredentialRecord;

/// Something that can turn an authorization code into an access token
pub(crate) trait TokenExchanger {
    fn exchange(&self, code: &str) -> Result<String>;
}

/// Exchanges codes against the instance an app was just registered with
pub(crate) struct ServiceExchanger<'a, S: SocialService> {
    pub service: &'a S,
    pub server: &'a str,
    pub app: &'a AppCredentials,
}

impl<S: SocialService> TokenExchanger for ServiceExchanger<'_, S> {
    fn exchange(&self, code: &str) -> Result<String> {
        self.service.exchange_code(self.server, self.app, code)
    }
}

/// Where the operator is asked for the authorization code
pub(crate) struct Prompt<R, W> {
    pub input: R,
    pub output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// Ask the operator to authorize at `url` and read back one code
    ///
    /// Blank lines are skipped; end of input is an error since nobody is left
    /// to answer.
    fn ask(&mut self, url: &Url) -> Result<String> {
        writeln!(
            self.output,
            "Click or copy the following link to authorize with your instance:"
        )?;
        writeln!(self.output, "{}", url)?;
        writeln!(self.output, "Then paste the token code provided:")?;
        self.output.flush()?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::PromptClosed);
            }
            let code = line.trim();
            if !code.is_empty() {
                return Ok(code.to_string());
            }
        }
    }
}

/// The page where the operator grants the app access and receives a code
pub(crate) fn authorize_url(server: &str, client_id: &str) -> Result<Url> {
    let mut url = endpoint(server, "oauth/authorize")?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("scope", SCOPES)
        .append_pair("redirect_uri", OOB_REDIRECT)
        .append_pair("response_type", "code");
    Ok(url)
}

/// Keep prompting until a code is successfully exchanged for a token
///
/// There is no attempt limit: every failed exchange is reported and the
/// operator is asked again.
pub(crate) fn await_token<R: BufRead, W: Write>(
    exchanger: &dyn TokenExchanger,
    url: &Url,
    prompt: &mut Prompt<R, W>,
) -> Result<String> {
    loop {
        let code = prompt.ask(url)?;
        match exchanger.exchange(&code) {
            Ok(token) => return Ok(token),
            Err(e) => warn!("Error validating token: {}", e),
        }
    }
}

/// Register with the instance and walk the operator through authorization,
/// returning a record that is ready to post with
pub(crate) fn authorize<S: SocialService, R: BufRead, W: Write>(
    service: &S,
    server: &str,
    prompt: &mut Prompt<R, W>,
) -> Result<CredentialRecord> {
    let app = service.register_app(server)?;
    let url = authorize_url(server, &app.client_id)?;

    let exchanger = ServiceExchanger {
        service,
        server,
        app: &app,
    };
    let access_token = await_token(&exchanger, &url, prompt)?;
    info!("Authorized with {}", server);

    Ok(CredentialRecord {
        server: server.to_string(),
        client_id: app.client_id,
        client_secret: app.client_secret,
        access_token,
        last_commit: String::new(),
    })
}
