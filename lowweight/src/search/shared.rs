use super::information_set::Candidate;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Cooperative cancellation flag shared between a caller and the workers of one search.
///
/// Pass it to [`LowWeightSearch::canteaut_chabaud_until`](crate::LowWeightSearch::canteaut_chabaud_until)
/// and call [`stop`](StopHandle::stop) from any thread. Workers check it once per iteration, so
/// a stop request takes effect within one iteration. Once stopped, a handle stays stopped.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// The global best candidate, guarded by a mutex and mirrored by an atomic weight that workers
/// read without locking.
pub(crate) struct SharedBest {
    weight: AtomicUsize,
    slot: Mutex<Option<Candidate>>,
}

impl SharedBest {
    pub fn new() -> Self {
        Self {
            weight: AtomicUsize::new(usize::MAX),
            slot: Mutex::new(None),
        }
    }

    pub fn weight(&self) -> usize {
        self.weight.load(Ordering::Acquire)
    }

    /// Stores `candidate` only if it is strictly lighter than the current best.
    pub fn offer(&self, candidate: Candidate) -> bool {
        if candidate.weight >= self.weight() {
            return false;
        }
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let current = slot.as_ref().map_or(usize::MAX, |best| best.weight);
        if candidate.weight >= current {
            return false;
        }
        self.weight.store(candidate.weight, Ordering::Release);
        *slot = Some(candidate);
        true
    }

    pub fn into_inner(self) -> Option<Candidate> {
        self.slot.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf2::BitVec;

    fn candidate(weight: usize) -> Candidate {
        Candidate {
            weight,
            bits: BitVec::ones(weight),
        }
    }

    #[test]
    fn offer_never_regresses() {
        let best = SharedBest::new();
        assert!(best.offer(candidate(5)));
        assert!(!best.offer(candidate(7)));
        assert!(!best.offer(candidate(5)));
        assert!(best.offer(candidate(3)));
        assert_eq!(best.weight(), 3);
        assert_eq!(best.into_inner().map(|best| best.weight), Some(3));
    }
}
