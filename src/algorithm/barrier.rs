use parking_lot::{Condvar, Mutex};

/// Counting barrier that a failing worker can open for everyone
///
/// Once cancelled, every pending and future `wait` returns
/// [`WaitResult::Cancelled`] instead of blocking.
pub(crate) struct CancellableBarrier {
    state: Mutex<BarrierState>,
    cvar: Condvar,
    parties: usize,
}

struct BarrierState {
    arrived: usize,
    generation: u64,
    cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitResult {
    Passed,
    Cancelled,
}

impl WaitResult {
    pub(crate) fn is_cancelled(&self) -> bool {
        matches!(self, WaitResult::Cancelled)
    }
}

impl CancellableBarrier {
    pub(crate) fn new(parties: usize) -> Self {
        CancellableBarrier {
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                cancelled: false,
            }),
            cvar: Condvar::new(),
            parties,
        }
    }

    pub(crate) fn wait(&self) -> WaitResult {
        let mut state = self.state.lock();
        if state.cancelled {
            return WaitResult::Cancelled;
        }

        let generation = state.generation;
        state.arrived += 1;

        if state.arrived < self.parties {
            self.cvar
                .wait_while(&mut state, |s| s.generation == generation && !s.cancelled);
            if state.cancelled {
                WaitResult::Cancelled
            } else {
                WaitResult::Passed
            }
        } else {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.cvar.notify_all();
            WaitResult::Passed
        }
    }

    /// Releases every waiter and turns all later waits into no-ops
    pub(crate) fn cancel(&self) {
        let mut state = self.state.lock();
        state.cancelled = true;
        self.cvar.notify_all();
    }
}
