use glam::Vec2;

/// Turns absolute cursor positions into per-event deltas.
///
/// Screen y grows downward, so the vertical delta is flipped: moving the
/// mouse up yields a positive `y`, which raises the camera pitch. The
/// first position after construction or [`reset`](Self::reset) only seeds
/// the tracker; reporting a delta from a stale or default origin would
/// make the view jump.
#[derive(Debug, Clone, Default)]
pub struct MouseTracker {
    last: Option<Vec2>,
}

impl MouseTracker {
    /// Create a tracker that discards its first position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last position; the next move reports no delta.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Record a new cursor position and return the delta since the last one.
    pub fn track(&mut self, x: f32, y: f32) -> Vec2 {
        let current = Vec2::new(x, y);
        let delta = self
            .last
            .map_or(Vec2::ZERO, |last| Vec2::new(current.x - last.x, last.y - current.y));
        self.last = Some(current);
        delta
    }

    /// Last recorded cursor position.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_is_discarded() {
        let mut tracker = MouseTracker::new();
        assert_eq!(tracker.track(640.0, 384.0), Vec2::ZERO);
        assert_eq!(tracker.track(650.0, 380.0), Vec2::new(10.0, 4.0));
    }

    #[test]
    fn reset_discards_next_move() {
        let mut tracker = MouseTracker::new();
        let _ = tracker.track(0.0, 0.0);
        tracker.reset();
        assert_eq!(tracker.track(500.0, 500.0), Vec2::ZERO);
        assert_eq!(tracker.position(), Some(Vec2::new(500.0, 500.0)));
    }
}
