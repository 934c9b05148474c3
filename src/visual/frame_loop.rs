//! Frame scheduling
//!
//! Hosts drive the player at their display rate. A `FrameScheduler` stands in
//! for the host's "call me before the next repaint" facility: the player
//! requests a frame, the host takes the due handles once per refresh and hands
//! them back to `PlayerShell::animation_frame`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    /// Cancel a pending frame. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        let removed = self.pending.len() != before;
        if removed {
            self.cancelled += 1;
        }
        removed
    }

    /// Handles due for this refresh, oldest first
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total frames ever requested
    pub fn requested_count(&self) -> u64 {
        self.requested
    }

    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

/// Self-rescheduling loop with at most one outstanding frame
#[derive(Debug, Default)]
pub struct AnimationLoop {
    handle: Option<FrameHandle>,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<FrameHandle> {
        self.handle
    }

    /// Request a frame unless one is already outstanding
    pub fn start(&mut self, scheduler: &mut FrameScheduler) {
        if self.handle.is_none() {
            self.handle = Some(scheduler.request_frame());
        }
    }

    /// Claim a fired frame. Returns false for stale handles (cancelled loop,
    /// or a frame belonging to someone else).
    pub fn accept(&mut self, fired: FrameHandle) -> bool {
        if self.handle == Some(fired) {
            self.handle = None;
            true
        } else {
            false
        }
    }

    /// Schedule the successor of an accepted frame
    pub fn reschedule(&mut self, scheduler: &mut FrameScheduler) {
        self.start(scheduler);
    }

    pub fn stop(&mut self, scheduler: &mut FrameScheduler) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel_frame(handle);
        }
    }
}
