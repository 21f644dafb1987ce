use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use focusguard_core::{PassGuard, PassLock};
use focusguard_domain::{FocusError, Result as DomainResult};

/// Pass lock whose state is fixed by the test.
pub enum StubPassLock {
    /// Free; counts how often it was taken.
    Free(Arc<AtomicUsize>),
    /// Held by another process.
    Held,
    Broken(FocusError),
}

impl StubPassLock {
    pub fn acquisitions(&self) -> usize {
        match self {
            Self::Free(count) => count.load(Ordering::SeqCst),
            _ => 0,
        }
    }
}

impl PassLock for StubPassLock {
    fn try_acquire(&self) -> DomainResult<Option<PassGuard>> {
        match self {
            Self::Free(count) => {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(Some(Box::new(())))
            }
            Self::Held => Ok(None),
            Self::Broken(error) => Err(error.clone()),
        }
    }
}
