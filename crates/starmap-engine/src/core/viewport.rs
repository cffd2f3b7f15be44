use glam::Vec2;

/// Axis-aligned world rectangle currently on screen. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Check if a world-space point lies inside the bounds.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// The pannable, zoomable window onto the galaxy.
///
/// The host owns the actual gestures (drag-pan, wheel zoom) and reports the
/// result here; the engine only moves the center for programmatic pans.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Center position in world space.
    pub center: Vec2,
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// Canvas width in screen pixels.
    pub screen_width: f32,
    /// Canvas height in screen pixels.
    pub screen_height: f32,
}

/// Half-extents and center handed to layers that animate with the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportData {
    pub center: Vec2,
    pub x_radius: f32,
    pub y_radius: f32,
}

impl Viewport {
    /// A viewport showing the world at 100% zoom.
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            width: screen_width,
            height: screen_height,
            screen_width,
            screen_height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        Bounds {
            left: self.center.x - half_w,
            right: self.center.x + half_w,
            top: self.center.y - half_h,
            bottom: self.center.y + half_h,
        }
    }

    pub fn data(&self) -> ViewportData {
        ViewportData {
            center: self.center,
            x_radius: self.width / 2.0,
            y_radius: self.height / 2.0,
        }
    }

    /// Screen pixels per world unit, as a percentage.
    pub fn zoom_percent(&self) -> f32 {
        (self.screen_width / self.bounds().width()) * 100.0
    }

    pub fn move_center(&mut self, target: Vec2) {
        self.center = target;
    }

    /// Set the visible world area, keeping the center.
    pub fn set_visible_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Resize the canvas, keeping the zoom level. A collapsed canvas (hidden
    /// tab, `display: none`) reports zero and is ignored.
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !usable(screen_width) || !usable(screen_height) {
            return;
        }
        let scale = self.width / self.screen_width;
        self.screen_width = screen_width;
        self.screen_height = screen_height;
        self.width = screen_width * scale;
        self.height = screen_height * scale;
    }
}

/// What one tick learned about the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickFrame {
    pub position_changing: bool,
    pub zoom_changing: bool,
    pub zoom_percent: f32,
    pub bounds: Bounds,
}

/// Per-frame zoom and pan change detection.
#[derive(Debug, Clone)]
pub struct ZoomTracker {
    zoom_percent: f32,
    last_zoom_percent: f32,
    last_center: Option<Vec2>,
    current_center: Option<Vec2>,
    hysteresis: f32,
}

impl ZoomTracker {
    pub fn new(hysteresis: f32) -> Self {
        Self {
            zoom_percent: 100.0,
            last_zoom_percent: 100.0,
            last_center: None,
            current_center: None,
            hysteresis,
        }
    }

    pub fn zoom_percent(&self) -> f32 {
        self.zoom_percent
    }

    /// Sample the viewport for this frame.
    pub fn tick(&mut self, viewport: &Viewport) -> TickFrame {
        self.last_center = self.current_center;
        self.current_center = Some(viewport.center);
        self.zoom_percent = viewport.zoom_percent();

        let position_changing = match (self.last_center, self.current_center) {
            (Some(last), Some(current)) => last.x != current.x || last.y != current.y,
            _ => true,
        };
        let zoom_changing = (self.zoom_percent - self.last_zoom_percent).abs() > self.hysteresis;

        self.last_zoom_percent = self.zoom_percent;

        TickFrame {
            position_changing,
            zoom_changing,
            zoom_percent: self.zoom_percent,
            bounds: viewport.bounds(),
        }
    }

    /// Recompute zoom outside the frame loop. Change detection is untouched.
    pub fn refresh(&mut self, viewport: &Viewport) -> f32 {
        self.zoom_percent = viewport.zoom_percent();
        self.zoom_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_centered() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.move_center(Vec2::new(100.0, 50.0));
        let b = vp.bounds();
        assert_eq!(b.left, -300.0);
        assert_eq!(b.right, 500.0);
        assert_eq!(b.top, -250.0);
        assert_eq!(b.bottom, 350.0);
        assert_eq!(b.center(), Vec2::new(100.0, 50.0));
        assert!(b.contains(Vec2::new(0.0, 0.0)));
        assert!(!b.contains(Vec2::new(501.0, 0.0)));
    }

    #[test]
    fn zoom_is_screen_over_world_width() {
        let mut vp = Viewport::new(800.0, 600.0);
        assert!((vp.zoom_percent() - 100.0).abs() < 1e-4);
        vp.set_visible_size(400.0, 300.0);
        assert!((vp.zoom_percent() - 200.0).abs() < 1e-4);
    }

    #[test]
    fn resize_keeps_zoom() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_visible_size(1600.0, 1200.0);
        vp.resize(1920.0, 1080.0);
        assert!((vp.zoom_percent() - 50.0).abs() < 1e-3);
        assert!((vp.height - 2160.0).abs() < 1e-3);
    }

    #[test]
    fn collapsed_canvas_keeps_zoom() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_visible_size(400.0, 300.0);
        vp.resize(0.0, 0.0);
        vp.resize(f32::NAN, 600.0);
        assert!((vp.zoom_percent() - 200.0).abs() < 1e-3);

        vp.resize(1600.0, 1200.0);
        assert!((vp.zoom_percent() - 200.0).abs() < 1e-3);
        assert!((vp.width - 800.0).abs() < 1e-3);
        assert!(vp.bounds().left.is_finite());
    }

    #[test]
    fn first_tick_reports_position_change() {
        let vp = Viewport::new(800.0, 600.0);
        let mut tracker = ZoomTracker::new(1.0 / 128.0);
        assert!(tracker.tick(&vp).position_changing);
        assert!(!tracker.tick(&vp).position_changing);
    }

    #[test]
    fn panning_reports_position_change() {
        let mut vp = Viewport::new(800.0, 600.0);
        let mut tracker = ZoomTracker::new(1.0 / 128.0);
        tracker.tick(&vp);
        vp.move_center(Vec2::new(0.0, 1.0));
        let frame = tracker.tick(&vp);
        assert!(frame.position_changing);
        assert!(!frame.zoom_changing);
    }

    #[test]
    fn identical_width_is_not_zoom_change() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_visible_size(533.0, 400.0);
        let mut tracker = ZoomTracker::new(1.0 / 128.0);
        tracker.tick(&vp);
        assert!(!tracker.tick(&vp).zoom_changing);
        assert!(!tracker.tick(&vp).zoom_changing);
    }

    #[test]
    fn zoom_change_beyond_hysteresis_is_reported() {
        let mut vp = Viewport::new(800.0, 600.0);
        let mut tracker = ZoomTracker::new(1.0 / 128.0);
        tracker.tick(&vp);

        // 100% -> 100.5%: well above 1/128 of a percent.
        vp.set_visible_size(800.0 / 1.005, 600.0 / 1.005);
        let frame = tracker.tick(&vp);
        assert!(frame.zoom_changing);
        assert!((frame.zoom_percent - 100.5).abs() < 1e-3);

        // Settles on the next tick.
        assert!(!tracker.tick(&vp).zoom_changing);
    }

    #[test]
    fn tiny_zoom_noise_is_suppressed() {
        let mut vp = Viewport::new(800.0, 600.0);
        let mut tracker = ZoomTracker::new(1.0 / 128.0);
        tracker.tick(&vp);
        // 100% -> ~100.001%
        vp.set_visible_size(799.992, 600.0);
        assert!(!tracker.tick(&vp).zoom_changing);
    }

    #[test]
    fn refresh_updates_zoom_without_consuming_change() {
        let mut vp = Viewport::new(800.0, 600.0);
        let mut tracker = ZoomTracker::new(1.0 / 128.0);
        tracker.tick(&vp);
        vp.set_visible_size(400.0, 300.0);
        assert!((tracker.refresh(&vp) - 200.0).abs() < 1e-4);
        assert!(tracker.tick(&vp).zoom_changing);
    }
}
