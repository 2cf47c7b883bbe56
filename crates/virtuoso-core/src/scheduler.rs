/// Host-side frame request, modelled on a redraw callback: the session asks
/// for one more frame after each tick and cancels the request when play ends.
/// A tick that arrives without an outstanding request is dropped.
pub trait FrameScheduler: Send {
    fn request_frame(&mut self);
    fn cancel_frame(&mut self);
    /// Consumes the outstanding request. False means no tick was asked for.
    fn take_frame(&mut self) -> bool;
    fn is_pending(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub requested: u64,
    pub cancelled: u64,
    pub delivered: u64,
}

/// Single-slot scheduler owned by the session. The host polls `is_pending`
/// each frame; nothing runs on its own.
#[derive(Debug, Default)]
pub struct PendingFrame {
    pending: bool,
    stats: FrameStats,
}

impl PendingFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

impl FrameScheduler for PendingFrame {
    fn request_frame(&mut self) {
        self.pending = true;
        self.stats.requested += 1;
    }

    fn cancel_frame(&mut self) {
        if self.pending {
            self.stats.cancelled += 1;
        }
        self.pending = false;
    }

    fn take_frame(&mut self) -> bool {
        let pending = std::mem::take(&mut self.pending);
        if pending {
            self.stats.delivered += 1;
        }
        pending
    }

    fn is_pending(&self) -> bool {
        self.pending
    }
}
