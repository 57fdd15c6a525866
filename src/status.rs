use std::path::Path;

use log::info;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{Error, Result};
use crate::mastodon::{PostedStatus, SocialService, Toot, Visibility};
use crate::store::{self, CredentialRecord};

/// Values a status template can refer to
#[derive(Debug, Serialize)]
pub struct TemplateInput<'a> {
    pub commit: &'a str,
    pub repository: &'a str,
}

pub(crate) fn default_message(input: &TemplateInput) -> String {
    format!(
        "Repository {} was pushed to {}",
        input.repository, input.commit
    )
}

/// Render `source` as a tera template with `{{ commit }}` and `{{ repository }}`
pub(crate) fn render(source: &str, input: &TemplateInput) -> Result<String> {
    let context = Context::from_serialize(input)?;
    Ok(Tera::one_off(source, &context, false)?)
}

/// Build the status text, from the template file at `tmpl` if one is given
pub(crate) fn compose(tmpl: Option<&Path>, input: &TemplateInput) -> Result<String> {
    let Some(path) = tmpl else {
        return Ok(default_message(input));
    };

    let source = std::fs::read_to_string(path).map_err(|source| Error::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    render(&source, input)
}

/// Post `message` and remember `commit` as announced
///
/// The record is saved before the post result is looked at, so a failed post
/// still marks the commit as announced.
pub(crate) fn announce<S: SocialService>(
    service: &S,
    storage: &Path,
    record: &mut CredentialRecord,
    commit: &str,
    message: String,
) -> Result<PostedStatus> {
    let toot = Toot {
        status: message,
        visibility: Visibility::Unlisted,
    };
    let posted = service.post_status(record, &toot);

    record.last_commit = commit.to_string();
    store::save(storage, record)?;

    let posted = posted?;
    info!(
        "Posted status {}",
        posted.url.as_deref().unwrap_or(posted.id.as_str())
    );
    Ok(posted)
}
