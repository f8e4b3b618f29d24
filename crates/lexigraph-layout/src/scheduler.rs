//! Frame scheduling for physics runs.
//!
//! Models the host's next-frame callback. Each run gets a new generation;
//! starting a run or cancelling invalidates every outstanding token, so at
//! most one run ever advances.

/// Handle for one scheduled frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken {
    generation: u64,
    frame: usize,
}

impl FrameToken {
    /// Run this frame belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Tracks the single active physics run.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    generation: u64,
    remaining: usize,
    pending: Option<FrameToken>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run of `iterations` frames, cancelling any pending frame.
    /// Returns the first token, or `None` for an empty run.
    pub fn start(&mut self, iterations: usize) -> Option<FrameToken> {
        self.cancel();
        self.remaining = iterations;
        self.pending = (iterations > 0).then_some(FrameToken {
            generation: self.generation,
            frame: 0,
        });
        self.pending
    }

    /// Cancels the active run.
    pub fn cancel(&mut self) {
        if self.pending.is_some() {
            log::trace!("cancelling physics run {}", self.generation);
        }
        self.generation += 1;
        self.remaining = 0;
        self.pending = None;
    }

    /// The frame the host should call back with next.
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames left in the active run.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Consumes a frame. Returns `true` if `token` is the pending frame, in
    /// which case the caller advances the simulation once. Stale tokens are
    /// ignored.
    pub fn accept(&mut self, token: FrameToken) -> bool {
        if self.pending != Some(token) {
            return false;
        }
        self.remaining -= 1;
        self.pending = (self.remaining > 0).then_some(FrameToken {
            generation: token.generation,
            frame: token.frame + 1,
        });
        true
    }
}
