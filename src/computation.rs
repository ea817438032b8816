use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use thiserror::Error;

///
/// Snapshot of the state of a long-running computation (currently only
/// [`crate::algorithms::buchberger::buchberger()`]), passed to
/// [`ComputationController::checkpoint()`].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// number of S-pairs taken from the queue so far, including the current one
    pub processed_pairs: usize,
    /// number of S-pairs still waiting in the queue
    pub pending_pairs: usize,
    /// current length of the basis
    pub basis_len: usize
}

///
/// Reason why a [`ComputationController`] stopped a computation.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Aborted {
    #[error("processed more than {0} S-pairs")]
    PairLimit(usize),
    #[error("basis grew beyond {0} elements")]
    BasisLimit(usize),
    #[error("cancelled")]
    Cancelled
}

///
/// Trait for objects that observe a computation and can decide to abort it.
///
/// Algorithms call [`ComputationController::checkpoint()`] once per unit of work (for
/// Buchberger's algorithm, once per processed S-pair). If it returns `Err`, the algorithm
/// stops immediately and the error is propagated to the caller; no partial results
/// are returned.
///
pub trait ComputationController: Clone {

    fn checkpoint(&self, progress: &Progress) -> Result<(), Aborted>;
}

///
/// [`ComputationController`] that never aborts.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct DontObserve;

impl ComputationController for DontObserve {

    fn checkpoint(&self, _progress: &Progress) -> Result<(), Aborted> {
        Ok(())
    }
}

///
/// [`ComputationController`] that aborts once the number of processed S-pairs or
/// the size of the basis exceeds the configured bounds. Unset bounds are not checked.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_pairs: Option<usize>,
    pub max_basis_len: Option<usize>
}

impl Limits {

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_pairs(mut self, max_pairs: usize) -> Self {
        self.max_pairs = Some(max_pairs);
        self
    }

    pub fn with_max_basis_len(mut self, max_basis_len: usize) -> Self {
        self.max_basis_len = Some(max_basis_len);
        self
    }
}

impl ComputationController for Limits {

    fn checkpoint(&self, progress: &Progress) -> Result<(), Aborted> {
        if let Some(max_pairs) = self.max_pairs {
            if progress.processed_pairs > max_pairs {
                return Err(Aborted::PairLimit(max_pairs));
            }
        }
        if let Some(max_basis_len) = self.max_basis_len {
            if progress.basis_len > max_basis_len {
                return Err(Aborted::BasisLimit(max_basis_len));
            }
        }
        return Ok(());
    }
}

///
/// [`ComputationController`] for cooperative cancellation. All clones share the same
/// flag, so a clone can be kept (possibly on another thread) and used to cancel a
/// running computation, which will stop at its next checkpoint.
///
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>
}

impl CancellationToken {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl ComputationController for CancellationToken {

    fn checkpoint(&self, _progress: &Progress) -> Result<(), Aborted> {
        if self.is_cancelled() {
            Err(Aborted::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl<A, B> ComputationController for (A, B)
    where A: ComputationController,
        B: ComputationController
{
    fn checkpoint(&self, progress: &Progress) -> Result<(), Aborted> {
        self.0.checkpoint(progress)?;
        self.1.checkpoint(progress)
    }
}

#[cfg(test)]
fn progress(processed_pairs: usize, basis_len: usize) -> Progress {
    Progress { processed_pairs, pending_pairs: 0, basis_len }
}

#[test]
fn test_limits() {
    let limits = Limits::unbounded().with_max_pairs(10).with_max_basis_len(4);
    assert_eq!(Ok(()), limits.checkpoint(&progress(10, 4)));
    assert_eq!(Err(Aborted::PairLimit(10)), limits.checkpoint(&progress(11, 4)));
    assert_eq!(Err(Aborted::BasisLimit(4)), limits.checkpoint(&progress(3, 5)));
    assert_eq!(Ok(()), Limits::unbounded().checkpoint(&progress(usize::MAX, usize::MAX)));
}

#[test]
fn test_cancellation_token() {
    let token = CancellationToken::new();
    let observer = (DontObserve, token.clone());
    assert_eq!(Ok(()), observer.checkpoint(&progress(1, 1)));
    token.cancel();
    assert!(observer.1.is_cancelled());
    assert_eq!(Err(Aborted::Cancelled), observer.checkpoint(&progress(1, 1)));
}

#[test]
fn test_deserialize_limits() {
    let limits: Limits = serde_json::from_str(r#"{ "max_pairs": 100 }"#).unwrap();
    assert_eq!(Limits::unbounded().with_max_pairs(100), limits);
}
