// file: src/repository/remote.rs
// description: connection details for a remote repository
// reference: internal data structures

use crate::config::SourceConfig;
use crate::error::{Result, SourceError};
use serde::{Deserialize, Serialize};

/// Everything needed to talk to a remote repository: URL, branch selection,
/// clone depth, and optional credentials and proxy. No logic beyond
/// validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialedRemote {
    pub url: String,
    /// `None` means "follow the remote's default branch".
    pub branch: Option<String>,
    pub shallow_depth: i32,
    pub username: Option<String>,
    pub token: Option<String>,
    pub proxy_url: Option<String>,
}

impl CredentialedRemote {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: None,
            shallow_depth: 1,
            username: None,
            token: None,
            proxy_url: None,
        }
    }

    pub fn from_config(source: &SourceConfig) -> Self {
        let (username, token) = match &source.credentials {
            Some(credentials) => (
                Some(credentials.username.clone()),
                Some(credentials.token.clone()),
            ),
            None => (None, None),
        };

        Self {
            url: source.remote.clone(),
            branch: source.branch.clone(),
            shallow_depth: source.shallow_depth,
            username,
            token,
            proxy_url: source.proxy.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(SourceError::Config(
                "remote URL must not be empty".to_string(),
            ));
        }

        let plausible = self.url.starts_with("http://")
            || self.url.starts_with("https://")
            || self.url.starts_with("ssh://")
            || self.url.starts_with("git@")
            || self.url.starts_with("file://")
            || self.url.starts_with('/');
        if !plausible {
            return Err(SourceError::Config(format!(
                "Unrecognized remote URL format: {}",
                self.url
            )));
        }

        if self.shallow_depth < 1 {
            return Err(SourceError::Config(
                "shallow_depth must be at least 1".to_string(),
            ));
        }

        // Credentials are all-or-nothing.
        if self.username.is_some() != self.token.is_some() {
            return Err(SourceError::Config(
                "username and token must be supplied together".to_string(),
            ));
        }

        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_common_url_forms() {
        for url in [
            "https://github.com/user/repo.git",
            "http://git.internal/repo",
            "ssh://git@host/repo.git",
            "git@github.com:user/repo.git",
            "file:///srv/git/repo",
            "/srv/git/repo",
        ] {
            assert!(CredentialedRemote::new(url).validate().is_ok(), "{url}");
        }
    }

    #[test]
    fn test_validate_rejects_garbage_url() {
        assert!(CredentialedRemote::new("not a url").validate().is_err());
        assert!(CredentialedRemote::new("").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unpaired_credentials() {
        let mut remote = CredentialedRemote::new("https://github.com/user/repo.git");
        remote.username = Some("user".to_string());
        assert!(remote.validate().is_err());

        remote.token = Some("token".to_string());
        assert!(remote.validate().is_ok());
        assert!(remote.has_credentials());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut remote = CredentialedRemote::new("https://github.com/user/repo.git");
        remote.shallow_depth = 0;
        assert!(remote.validate().is_err());
    }
}
