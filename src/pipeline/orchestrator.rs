// file: src/pipeline/orchestrator.rs
// description: coordinates mirror sync, file enumeration, and node creation
// reference: orchestrates asynchronous import workflow

use crate::config::Config;
use crate::error::{Result, SourceError};
use crate::importer::{NodeImporter, ReferenceResolver, RoutePlanner};
use crate::models::ContentNode;
use crate::pipeline::progress::{ImportStats, ProgressTracker};
use crate::repository::{CredentialedRemote, FileEnumerator, RepositorySynchronizer};
use crate::store::ContentStore;
use futures::stream::{self, StreamExt};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{OwnedMutexGuard, Semaphore};
use tracing::{error, info, warn};

lazy_static! {
    // Runs targeting the same mirror directory must not overlap; distinct
    // mirrors are independent and run fully in parallel.
    static ref MIRROR_GUARDS: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>> =
        Mutex::new(HashMap::new());
}

fn mirror_guard(path: &Path) -> Arc<tokio::sync::Mutex<()>> {
    let mut guards = MIRROR_GUARDS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guards.entry(path.to_path_buf()).or_default().clone()
}

pub struct ImportPipeline {
    config: Config,
}

impl ImportPipeline {
    pub fn new(config: Config) -> Result<Self> {
        CredentialedRemote::from_config(&config.source).validate()?;
        Ok(Self { config })
    }

    /// One full import run: sync the mirror, enumerate matching files,
    /// import them concurrently, then register nodes and resolve references.
    /// A sync failure other than a remote mismatch degrades the run to zero
    /// files instead of failing it.
    pub async fn run(&self, store: &mut ContentStore, limit: Option<usize>) -> Result<ImportStats> {
        info!("Starting import run for {}", self.config.source.remote);

        self.register_collections(store);

        let mirror = self.config.mirror_path();
        let mut lock = Some(mirror_guard(&mirror).lock_owned().await);

        if self.config.pipeline.sync_on_start {
            if let Err(e) = self.sync_mirror(&mirror, &mut lock).await {
                if e.is_fatal() {
                    return Err(e);
                }
                warn!("Sync failed, continuing with zero files: {}", e);
                return Ok(ImportStats::new());
            }
            info!("Mirror sync complete");
        } else {
            info!("Sync disabled, importing from the existing mirror");
        }

        let mut files = self.enumerate_files(&mirror).await?;
        if let Some(limit) = limit {
            files.truncate(limit);
        }
        info!("Found {} files to import", files.len());

        if files.is_empty() {
            warn!("No files matched the configured patterns");
            return Ok(ImportStats::new());
        }

        let progress = Arc::new(ProgressTracker::new(files.len()));
        let nodes = self.import_files(&mirror, files, progress.clone()).await;

        let mut resolver = ReferenceResolver::new(self.config.source.normalized_refs());
        for node in &nodes {
            progress.set_message(format!("Registering {}", node.file_info.relative_path));
            store
                .add_collection(&self.config.source.type_name)
                .add_node(node.to_record()?)?;
            resolver.resolve(store, node)?;
        }

        let stats = progress.stats(resolver.created());
        progress.finish();
        log_final_stats(&stats);

        Ok(stats)
    }

    fn register_collections(&self, store: &mut ContentStore) {
        let refs = self.config.source.normalized_refs();

        let collection = store.add_collection(&self.config.source.type_name);
        for (field_name, descriptor) in &refs {
            collection.add_reference(field_name, &descriptor.type_name);
        }

        for descriptor in refs.values() {
            if descriptor.create {
                store.add_collection_with_route(&descriptor.type_name, descriptor.route.clone());
            }
        }
    }

    async fn sync_mirror(
        &self,
        mirror: &Path,
        lock: &mut Option<OwnedMutexGuard<()>>,
    ) -> Result<()> {
        let remote = CredentialedRemote::from_config(&self.config.source);
        let path = mirror.to_path_buf();
        let timeout = Duration::from_secs(self.config.pipeline.sync_timeout_secs);

        let mut task =
            tokio::task::spawn_blocking(move || RepositorySynchronizer::new(remote).sync(&path));

        match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(SourceError::Sync(format!("Sync task failed: {e}"))),
            Err(_) => {
                // A blocking git operation cannot be cancelled mid-flight.
                // The abandoned task takes the mirror guard with it, so no
                // later run can touch the mirror until it actually exits.
                if let Some(held) = lock.take() {
                    tokio::spawn(async move {
                        let _ = task.await;
                        drop(held);
                    });
                }
                Err(SourceError::Sync(format!(
                    "Sync timed out after {}s",
                    self.config.pipeline.sync_timeout_secs
                )))
            }
        }
    }

    async fn enumerate_files(&self, mirror: &Path) -> Result<Vec<String>> {
        let patterns = self.config.source.pattern.clone();
        let root = mirror.to_path_buf();

        tokio::task::spawn_blocking(move || FileEnumerator::new(&patterns)?.enumerate(&root))
            .await
            .map_err(|e| SourceError::Sync(format!("Enumeration task failed: {e}")))?
    }

    async fn import_files(
        &self,
        mirror: &Path,
        files: Vec<String>,
        progress: Arc<ProgressTracker>,
    ) -> Vec<ContentNode> {
        let importer = Arc::new(NodeImporter::new(
            mirror.to_path_buf(),
            RoutePlanner::new(&self.config.routes),
        ));
        let parallel_reads = self.config.pipeline.parallel_reads;
        let semaphore = Arc::new(Semaphore::new(parallel_reads));

        let tasks = files.into_iter().map(|file| {
            let importer = importer.clone();
            let semaphore = semaphore.clone();
            let progress = progress.clone();

            async move {
                let permit = semaphore.acquire_owned().await.ok()?;

                let imported = tokio::task::spawn_blocking({
                    let importer = importer.clone();
                    let file = file.clone();
                    move || importer.import_file(&file)
                })
                .await;

                drop(permit);

                match imported {
                    Ok(Ok(node)) => {
                        progress.add_bytes_read(node.content.len() as u64);
                        progress.inc_nodes_created();
                        Some(node)
                    }
                    Ok(Err(e)) => {
                        // Per-file policy: skip and continue, never emit a
                        // node with missing content.
                        progress.inc_files_failed();
                        warn!("Skipping {}: {}", file, e);
                        None
                    }
                    Err(e) => {
                        progress.inc_files_failed();
                        error!("Import task panicked: {}", e);
                        None
                    }
                }
            }
        });

        stream::iter(tasks)
            .buffer_unordered(parallel_reads)
            .filter_map(|result| async move { result })
            .collect()
            .await
    }
}

fn log_final_stats(stats: &ImportStats) {
    info!("=== Import Run Summary ===");
    info!("Duration: {} seconds", stats.duration_secs);
    info!("Files enumerated: {}", stats.files_enumerated);
    info!("Nodes created: {}", stats.nodes_created);
    info!("Files failed: {}", stats.files_failed);
    info!("Reference nodes created: {}", stats.refs_created);
    info!("Success rate: {:.2}%", stats.success_rate());
    info!("==========================");
}
