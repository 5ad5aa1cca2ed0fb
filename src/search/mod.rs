//! Search results.
//!
//! Ranking happens outside this program. A [`ResultSource`] turns a query
//! into an ordered list of [`SearchResult`]s, and [`Fetcher`] runs it off the
//! UI thread so typing never blocks on it.

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Default cap on the number of rows shown.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// One ranked hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(alias = "filepath")]
    pub identifier: String,
    pub score: f64,
}

impl SearchResult {
    pub fn new(identifier: impl Into<String>, score: f64) -> Self {
        Self {
            identifier: identifier.into(),
            score,
        }
    }
}

/// Failure to obtain results for a query.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to run {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} exited with {status}: {stderr}", program.display())]
    Exit {
        program: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("invalid results: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no search command configured")]
    NotConfigured,
    #[error("search cancelled")]
    Cancelled,
}

/// Anything that can rank documents for a query.
pub trait ResultSource: Send + Sync {
    /// Return results for `query`, best first.
    ///
    /// # Errors
    /// Returns an error when the underlying source cannot produce results.
    fn fetch(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;

    /// Abandon every fetch currently in progress.
    ///
    /// Interrupted fetches return [`SearchError::Cancelled`].
    fn cancel(&self) {}
}

/// Runs an external program with the query as its only argument.
///
/// The program must print a JSON array of `{"filepath": ..., "score": ...}`
/// objects (`identifier` is accepted in place of `filepath`). Running
/// children are tracked so [`ResultSource::cancel`] can kill them.
#[derive(Debug)]
pub struct CommandSource {
    program: PathBuf,
    running: Mutex<HashMap<u64, Child>>,
    next_id: AtomicU64,
    /// Fetches numbered below this were cancelled.
    cancel_floor: AtomicU64,
}

impl CommandSource {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            running: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            cancel_floor: AtomicU64::new(0),
        }
    }

    fn running(&self) -> MutexGuard<'_, HashMap<u64, Child>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultSource for CommandSource {
    fn fetch(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut child = Command::new(&self.program)
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SearchError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        {
            let mut running = self.running();
            if id < self.cancel_floor.load(Ordering::SeqCst) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SearchError::Cancelled);
            }
            running.insert(id, child);
        }

        // Drain stderr alongside stdout so a chatty program cannot block on a full pipe.
        let stderr_reader = thread::spawn(move || {
            let mut text = String::new();
            if let Some(mut pipe) = stderr {
                let _ = pipe.read_to_string(&mut text);
            }
            text
        });
        let mut out = Vec::new();
        let read = stdout.map_or(Ok(0), |mut pipe| pipe.read_to_end(&mut out));
        let err_text = stderr_reader.join().unwrap_or_default();

        // Killed children have already been taken out and reaped by `cancel`.
        let Some(mut child) = self.running().remove(&id) else {
            return Err(SearchError::Cancelled);
        };
        let status = child.wait().map_err(|source| SearchError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        read.map_err(|source| SearchError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(SearchError::Exit {
                program: self.program.clone(),
                status,
                stderr: err_text.trim().to_string(),
            });
        }
        parse_results(&out)
    }

    fn cancel(&self) {
        self.cancel_floor
            .store(self.next_id.load(Ordering::SeqCst), Ordering::SeqCst);
        let children: Vec<_> = self.running().drain().collect();
        for (id, mut child) in children {
            debug!(fetch = id, "killing search command");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Source used when no command is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl ResultSource for Unconfigured {
    fn fetch(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Err(SearchError::NotConfigured)
    }
}

/// Decode a JSON result array. Blank output means no results.
///
/// # Errors
/// Returns [`SearchError::Decode`] when the payload is not a result array.
pub fn parse_results(bytes: &[u8]) -> Result<Vec<SearchResult>, SearchError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// What to show for a completed search.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    NoMatches,
    Rows(Vec<SearchResult>),
}

/// Apply the display rule to a ranked list.
///
/// A list that is empty or whose best score is zero shows as no matches.
/// Otherwise rows are shown in order up to the first zero score, at most
/// `max` of them. Negative scores count as zero.
pub fn visible_results(results: Vec<SearchResult>, max: usize) -> ResultView {
    if results.first().is_none_or(|best| best.score <= 0.0) {
        return ResultView::NoMatches;
    }
    let rows: Vec<_> = results
        .into_iter()
        .take_while(|result| result.score > 0.0)
        .take(max)
        .collect();
    ResultView::Rows(rows)
}

/// Whether a query is worth submitting.
pub fn is_submittable(query: &str) -> bool {
    !query.trim().is_empty()
}

/// A finished fetch, tagged with the query it answers.
#[derive(Debug)]
pub struct FetchOutcome {
    pub query: String,
    pub result: Result<Vec<SearchResult>, SearchError>,
}

/// Runs fetches on worker threads and hands back their outcomes.
pub struct Fetcher {
    source: Arc<dyn ResultSource>,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher").finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new(source: Arc<dyn ResultSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { source, tx, rx }
    }

    /// Start fetching results for `query` in the background.
    ///
    /// # Errors
    /// Returns an error if the worker thread cannot be spawned.
    pub fn submit(&self, query: String) -> std::io::Result<()> {
        // Only the newest query is worth waiting for.
        self.source.cancel();
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::Builder::new()
            .name("quoteline-fetch".to_string())
            .spawn(move || {
                debug!(query = %query, "fetch started");
                let result = source.fetch(&query);
                match &result {
                    // A newer submit superseded this one; its outcome is the one to show.
                    Err(SearchError::Cancelled) => {
                        debug!(query = %query, "fetch cancelled");
                        return;
                    }
                    Err(err) => warn!(query = %query, error = %err, "fetch failed"),
                    Ok(_) => {}
                }
                let _ = tx.send(FetchOutcome { query, result });
            })?;
        Ok(())
    }

    /// Take a finished outcome without blocking.
    pub fn try_recv(&self) -> Option<FetchOutcome> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next outcome.
    #[cfg(test)]
    pub(crate) fn recv(&self) -> Option<FetchOutcome> {
        self.rx.recv().ok()
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        self.source.cancel();
    }
}
