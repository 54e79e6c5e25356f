/// Coalesces redraw requests into at most one render per frame.
///
/// Any number of [`request_redraw`](Self::request_redraw) calls between two
/// frames result in a single `true` from [`begin_frame`](Self::begin_frame).
#[derive(Debug, Default, Clone)]
pub struct FrameScheduler {
    dirty: bool,
    requests: u64,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_redraw(&mut self) {
        self.dirty = true;
        self.requests += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called once per display refresh. Returns whether a render is due and
    /// clears the request.
    pub fn begin_frame(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        self.frames += 1;
        true
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Frames actually rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
