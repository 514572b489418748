//! Breadcrumbs for crash reports.
//!
//! Each thread keeps the stage it is in and the header it is reading, so a
//! panic on a rayon worker names the header that caused it. Batch progress is
//! shared by all threads.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

thread_local! {
    static BREADCRUMB: RefCell<Breadcrumb> = const { RefCell::new(Breadcrumb::empty()) };
}

static BATCH: BatchProgress = BatchProgress::new();

/// Stage of an `extract` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discover,
    Analyze,
    Write,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Discover => "discovering headers",
            Self::Analyze => "analyzing header",
            Self::Write => "writing document",
        }
    }
}

/// What the current thread was doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb {
    pub stage: Option<Stage>,
    pub header: Option<PathBuf>,
}

impl Breadcrumb {
    const fn empty() -> Self {
        Self {
            stage: None,
            header: None,
        }
    }
}

/// Puts the previous breadcrumb back when dropped.
#[must_use = "the breadcrumb is restored as soon as the scope is dropped"]
pub struct BreadcrumbScope {
    saved: Breadcrumb,
}

impl Drop for BreadcrumbScope {
    fn drop(&mut self) {
        let saved = std::mem::take(&mut self.saved);
        BREADCRUMB.with(|crumb| *crumb.borrow_mut() = saved);
    }
}

fn update(change: impl FnOnce(&mut Breadcrumb)) -> BreadcrumbScope {
    BREADCRUMB.with(|crumb| {
        let mut crumb = crumb.borrow_mut();
        let saved = crumb.clone();
        change(&mut crumb);
        BreadcrumbScope { saved }
    })
}

pub fn enter_stage(stage: Stage) -> BreadcrumbScope {
    update(|crumb| crumb.stage = Some(stage))
}

/// Marks `path` as the header being analyzed; the stage becomes `Analyze`.
pub fn enter_header(path: &Path) -> BreadcrumbScope {
    update(|crumb| {
        crumb.stage = Some(Stage::Analyze);
        crumb.header = Some(path.to_path_buf());
    })
}

pub fn current_breadcrumb() -> Breadcrumb {
    BREADCRUMB.with(|crumb| crumb.borrow().clone())
}

/// Headers finished out of headers discovered, across all threads.
pub struct BatchProgress {
    done: AtomicUsize,
    total: AtomicUsize,
}

impl BatchProgress {
    const fn new() -> Self {
        Self {
            done: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
        }
    }

    fn start(&self, total: usize) {
        self.done.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    fn finish_one(&self) {
        self.done.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> (usize, usize) {
        (
            self.done.load(Ordering::Relaxed),
            self.total.load(Ordering::Relaxed),
        )
    }
}

pub fn start_batch(total: usize) {
    BATCH.start(total);
}

pub fn header_finished() {
    BATCH.finish_one();
}

/// `(done, total)` for the running batch.
pub fn batch_progress() -> (usize, usize) {
    BATCH.snapshot()
}
