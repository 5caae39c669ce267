// file: src/repository/sync.rs
// description: Mirror synchronization state machine using git2
// reference: https://docs.rs/git2

use crate::error::{Result, SourceError};
use crate::repository::remote::CredentialedRemote;
use git2::{ErrorClass, FetchOptions, ProxyOptions, RemoteCallbacks, Repository, ResetType};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Observed state of the mirror directory before a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorState {
    /// Directory is missing or empty; a fresh clone is needed.
    Absent,
    /// Valid working copy recorded against the configured remote.
    Matching,
    /// Valid working copy, but bound to a different remote URL.
    Mismatched(String),
    /// Looks like a repository but cannot be opened; delete and re-clone.
    Corrupt,
    /// Non-empty directory that is not a repository; never touched.
    Occupied,
}

pub struct RepositorySynchronizer {
    remote: CredentialedRemote,
}

impl RepositorySynchronizer {
    pub fn new(remote: CredentialedRemote) -> Self {
        Self { remote }
    }

    /// Bring `local_path` in sync with the configured remote. Idempotent:
    /// re-running with no remote changes leaves the mirror unchanged.
    pub fn sync(&self, local_path: &Path) -> Result<()> {
        self.remote.validate()?;

        match self.observe(local_path) {
            MirrorState::Absent => {
                info!("Mirror absent, cloning {}", self.remote.url);
                self.clone_mirror(local_path)
            }
            MirrorState::Matching => {
                info!("Mirror exists, refreshing from {}", self.remote.url);
                match self.refresh(local_path) {
                    Err(SourceError::Git(e)) if is_local_corruption(&e) => {
                        warn!("Mirror metadata unreadable ({}), re-cloning", e);
                        self.recover(local_path)
                    }
                    other => other,
                }
            }
            MirrorState::Corrupt => {
                warn!("Mirror at {} is corrupt, re-cloning", local_path.display());
                self.recover(local_path)
            }
            MirrorState::Mismatched(found) => Err(SourceError::RemoteMismatch {
                path: local_path.to_path_buf(),
                expected: self.remote.url.clone(),
                found,
            }),
            MirrorState::Occupied => Err(SourceError::Sync(format!(
                "Can't clone into {}: directory is not empty and not a repository",
                local_path.display()
            ))),
        }
    }

    pub fn observe(&self, path: &Path) -> MirrorState {
        if !path.exists() || directory_is_empty(path) {
            return MirrorState::Absent;
        }

        if !path.join(".git").exists() {
            return MirrorState::Occupied;
        }

        let repo = match Repository::open(path) {
            Ok(repo) => repo,
            Err(e) => {
                debug!("Failed to open mirror: {}", e);
                return MirrorState::Corrupt;
            }
        };

        match repo.find_remote("origin") {
            Ok(origin) => match origin.url() {
                Some(url) if url.trim() == self.remote.url.trim() => {
                    // Opening can succeed on a gutted repository (a blank
                    // HEAD file, for one); a mirror whose HEAD does not
                    // resolve has nothing worth preserving.
                    if repo.head().is_err() {
                        debug!("Mirror HEAD does not resolve");
                        MirrorState::Corrupt
                    } else {
                        MirrorState::Matching
                    }
                }
                Some(url) => MirrorState::Mismatched(url.to_string()),
                None => MirrorState::Corrupt,
            },
            Err(_) => MirrorState::Corrupt,
        }
    }

    /// Name of the branch currently checked out in the mirror.
    pub fn current_branch(&self, path: &Path) -> Result<String> {
        let repo = Repository::open(path)?;
        let head = repo.head()?;
        head.shorthand()
            .map(String::from)
            .ok_or_else(|| SourceError::Sync("HEAD is not on a branch".to_string()))
    }

    fn clone_mirror(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(self.fetch_options());

        if let Some(branch) = &self.remote.branch {
            builder.branch(branch);
        }

        builder.clone(&self.remote.url, path)?;
        info!("Cloned {} into {}", self.remote.url, path.display());
        Ok(())
    }

    /// Corrupt -> Clone transition. Runs strictly sequentially: the old
    /// directory is gone and the fresh clone complete before this returns,
    /// so nothing can enumerate a half-repaired mirror.
    fn recover(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path)?;
        self.clone_mirror(path)
    }

    fn refresh(&self, path: &Path) -> Result<()> {
        let repo = Repository::open(path)?;

        {
            let mut origin = repo.find_remote("origin")?;
            let mut opts = self.fetch_options();
            debug!("Fetching all heads from {}", self.remote.url);
            origin.fetch(
                &["+refs/heads/*:refs/remotes/origin/*"],
                Some(&mut opts),
                None,
            )?;
        }

        let branch = self.resolve_target_branch(&repo)?;
        let remote_ref = repo.find_reference(&format!("refs/remotes/origin/{branch}"))?;
        let target = remote_ref.peel_to_commit()?;

        let local_ref = format!("refs/heads/{branch}");
        match repo.find_reference(&local_ref) {
            Ok(mut reference) => {
                reference.set_target(target.id(), "git_source: refresh")?;
            }
            Err(_) => {
                repo.reference(&local_ref, target.id(), true, "git_source: refresh")?;
            }
        }

        repo.set_head(&local_ref)?;
        repo.reset(target.as_object(), ResetType::Hard, None)?;

        info!("Mirror refreshed to {} @ {}", branch, target.id());
        Ok(())
    }

    /// Explicit configured branch always wins; otherwise follow the remote's
    /// symbolic HEAD, resolved fresh on every refresh so a changed default
    /// branch is picked up.
    fn resolve_target_branch(&self, repo: &Repository) -> Result<String> {
        if let Some(branch) = &self.remote.branch {
            return Ok(branch.clone());
        }

        if let Ok(head) = repo.find_reference("refs/remotes/origin/HEAD")
            && let Some(target) = head.symbolic_target()
            && let Some(name) = target.strip_prefix("refs/remotes/origin/")
        {
            return Ok(name.to_string());
        }

        // No symbolic origin/HEAD on disk; ask the remote directly.
        let mut origin = repo.find_remote("origin")?;
        let connection =
            origin.connect_auth(git2::Direction::Fetch, Some(self.callbacks()), None)?;
        let default = connection.default_branch()?;
        default
            .as_str()
            .and_then(|name| name.strip_prefix("refs/heads/"))
            .map(String::from)
            .ok_or_else(|| {
                SourceError::Sync("could not resolve remote default branch".to_string())
            })
    }

    fn fetch_options(&self) -> FetchOptions<'static> {
        let mut opts = FetchOptions::new();
        opts.remote_callbacks(self.callbacks());

        // Local clones are always full; depth only applies to network
        // transports.
        if !is_local_url(&self.remote.url) {
            opts.depth(self.remote.shallow_depth);
        }

        if let Some(proxy) = &self.remote.proxy_url {
            let mut proxy_opts = ProxyOptions::new();
            proxy_opts.url(proxy);
            opts.proxy_options(proxy_opts);
        }

        opts
    }

    /// Credentials are attached to network operations only; nothing is
    /// written into the working copy's remote configuration.
    fn callbacks(&self) -> RemoteCallbacks<'static> {
        let mut callbacks = RemoteCallbacks::new();

        let username = self.remote.username.clone();
        let token = self.remote.token.clone();
        callbacks.credentials(move |_url, username_from_url, _allowed_types| {
            if let (Some(user), Some(token)) = (&username, &token) {
                return git2::Cred::userpass_plaintext(user, token);
            }

            if let Some(user) = username_from_url
                && let Ok(cred) = git2::Cred::ssh_key_from_agent(user)
            {
                return Ok(cred);
            }

            git2::Cred::default()
        });

        callbacks.transfer_progress(|stats| {
            if stats.received_objects() == stats.total_objects() {
                debug!(
                    "Resolving deltas {}/{}",
                    stats.indexed_deltas(),
                    stats.total_deltas()
                );
            } else if stats.total_objects() > 0 {
                debug!(
                    "Received {}/{} objects",
                    stats.received_objects(),
                    stats.total_objects()
                );
            }
            true
        });

        callbacks
    }
}

fn directory_is_empty(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => false,
    }
}

fn is_local_url(url: &str) -> bool {
    url.starts_with('/') || url.starts_with("file://") || url.starts_with("./")
}

fn is_local_corruption(e: &git2::Error) -> bool {
    matches!(
        e.class(),
        ErrorClass::Index | ErrorClass::Odb | ErrorClass::Object
    )
}
