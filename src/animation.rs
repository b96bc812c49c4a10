//! Time-driven frame cycling for animated tiles.

use std::time::{Duration, Instant};

use crate::tile::TileId;

/// One frame of an animation: which tile to show and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Tile shown.
    pub tile: TileId,
    /// Time before switching to the next frame.
    pub duration: Duration,
}

impl Frame {
    /// Frame lasting `duration_ms` milliseconds.
    pub fn from_millis(tile: TileId, duration_ms: u32) -> Self {
        Frame {
            tile,
            duration: Duration::from_millis(u64::from(duration_ms)),
        }
    }
}

/// Cyclic sequence of frames.
///
/// The current frame index only moves forward, wrapping to 0 after the
/// last frame, and only when [`Animation::advance_at`] observes that the
/// current frame's duration has elapsed.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<TileId>,
    durations: Vec<Duration>,
    index: usize,
    last_change: Instant,
}

impl Animation {
    /// Starts at frame 0 at `started`. Returns `None` for an empty frame list.
    pub fn new(frames: impl IntoIterator<Item = Frame>, started: Instant) -> Option<Self> {
        let (frames, durations): (Vec<_>, Vec<_>) =
            frames.into_iter().map(|f| (f.tile, f.duration)).unzip();
        if frames.is_empty() {
            return None;
        }
        Some(Animation {
            frames,
            durations,
            index: 0,
            last_change: started,
        })
    }

    /// [`advance_at`](Self::advance_at) with the current time.
    pub fn advance(&mut self) -> TileId {
        self.advance_at(Instant::now())
    }

    /// Moves to the next frame if the current one has been shown long
    /// enough, then returns the tile to draw.
    pub fn advance_at(&mut self, now: Instant) -> TileId {
        if now.saturating_duration_since(self.last_change) >= self.durations[self.index] {
            self.index = (self.index + 1) % self.frames.len();
            self.last_change = now;
        }
        self.frames[self.index]
    }

    /// Tile of the current frame, without advancing.
    pub fn current(&self) -> TileId {
        self.frames[self.index]
    }

    /// Index of the current frame.
    pub fn index(&self) -> usize {
        self.index
    }

    /// When the current frame started.
    pub fn last_change(&self) -> Instant {
        self.last_change
    }

    /// Frame tiles, in order.
    pub fn frames(&self) -> &[TileId] {
        &self.frames
    }

    /// Frame durations, parallel to [`frames`](Self::frames).
    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false for animations built by [`new`](Self::new).
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
