pub mod git;

use crate::error::Result;

/// A single ref advertised by a remote repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub name: String,
    pub hash: String,
}

impl RemoteRef {
    /// Null refs are advertised with an all-zero hash (e.g. capabilities on an
    /// empty repository) and never point to a real commit
    pub fn is_null(&self) -> bool {
        self.hash.bytes().all(|b| b == b'0')
    }
}

pub(crate) trait Remote {
    /// List every ref the remote at `url` advertises, without cloning it
    fn list(&self, url: &str) -> Result<Vec<RemoteRef>>;
}

/// Find the hash pointed to by `refspec`, skipping null refs
pub(crate) fn find_ref(refs: &[RemoteRef], refspec: &str) -> Option<String> {
    refs.iter()
        .filter(|r| r.name == refspec && !r.is_null())
        .last()
        .map(|r| r.hash.clone())
}
