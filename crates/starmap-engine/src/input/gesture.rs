use glam::Vec2;

/// Pointer data attached to a click coming from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInfo {
    /// Screen-space position of the click.
    pub screen: Vec2,
    /// Whether the interception modifier key (shift) was held.
    pub modifier: bool,
}

impl PointerInfo {
    pub fn at(x: f32, y: f32) -> Self {
        Self { screen: Vec2::new(x, y), modifier: false }
    }

    pub fn with_modifier(mut self) -> Self {
        self.modifier = true;
        self
    }
}

/// One-shot record of the last pointer-down, used to tell taps from pans.
///
/// Reset point: every pointer-down overwrites the record. A click is judged
/// against whatever pointer-down preceded it.
#[derive(Debug, Clone, Default)]
pub struct PointerGesture {
    down: Option<Vec2>,
}

impl PointerGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, screen: Vec2) {
        self.down = Some(screen);
    }

    pub fn last_down(&self) -> Option<Vec2> {
        self.down
    }

    /// True if the pointer travelled further than `threshold` pixels since
    /// the last pointer-down. Without a recorded pointer-down nothing is a drag.
    pub fn is_drag(&self, screen: Vec2, threshold: f32) -> bool {
        self.down
            .map(|down| down.distance(screen) > threshold)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_travel_is_a_tap() {
        let mut g = PointerGesture::new();
        g.pointer_down(Vec2::new(100.0, 100.0));
        assert!(!g.is_drag(Vec2::new(104.0, 103.0), 8.0));
        // Exactly on the threshold is still a tap.
        assert!(!g.is_drag(Vec2::new(108.0, 100.0), 8.0));
    }

    #[test]
    fn long_travel_is_a_drag() {
        let mut g = PointerGesture::new();
        g.pointer_down(Vec2::new(100.0, 100.0));
        assert!(g.is_drag(Vec2::new(106.0, 106.0), 8.0));
    }

    #[test]
    fn every_pointer_down_resets_the_origin() {
        let mut g = PointerGesture::new();
        g.pointer_down(Vec2::new(0.0, 0.0));
        g.pointer_down(Vec2::new(50.0, 50.0));
        assert!(!g.is_drag(Vec2::new(52.0, 52.0), 8.0));
        assert_eq!(g.last_down(), Some(Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn no_pointer_down_means_no_drag() {
        let g = PointerGesture::new();
        assert!(!g.is_drag(Vec2::new(1000.0, 1000.0), 8.0));
    }
}
