// file: src/pipeline/progress.rs
// description: progress tracking and statistics for import runs
// reference: uses indicatif for progress bars and tracks run metrics

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct ImportStats {
    pub files_enumerated: usize,
    pub nodes_created: usize,
    pub files_failed: usize,
    pub refs_created: usize,
    pub total_bytes_read: u64,
    pub duration_secs: u64,
}

impl ImportStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.nodes_created as f64 / self.duration_secs as f64
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.nodes_created + self.files_failed;
        if total == 0 {
            return 0.0;
        }
        (self.nodes_created as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    files_enumerated: usize,
    nodes_created: Arc<AtomicUsize>,
    files_failed: Arc<AtomicUsize>,
    bytes_read: Arc<AtomicU64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_files: usize) -> Self {
        let multi_progress = MultiProgress::new();
        let main_bar = create_progress_bar(&multi_progress, total_files as u64);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            files_enumerated: total_files,
            nodes_created: Arc::new(AtomicUsize::new(0)),
            files_failed: Arc::new(AtomicUsize::new(0)),
            bytes_read: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_nodes_created(&self) {
        self.nodes_created.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_files_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn add_bytes_read(&self, bytes: u64) {
        self.bytes_read.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn set_message(&self, message: String) {
        self.detail_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Import complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn stats(&self, refs_created: usize) -> ImportStats {
        ImportStats {
            files_enumerated: self.files_enumerated,
            nodes_created: self.nodes_created.load(Ordering::SeqCst),
            files_failed: self.files_failed.load(Ordering::SeqCst),
            refs_created,
            total_bytes_read: self.bytes_read.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self) {
        let nodes = self.nodes_created.load(Ordering::SeqCst);
        let failed = self.files_failed.load(Ordering::SeqCst);
        self.detail_bar
            .set_message(format!("Nodes: {} | Failed: {}", nodes, failed));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .expect("Failed to create progress bar template")
            .progress_chars("█▓▒░"),
    );
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}
