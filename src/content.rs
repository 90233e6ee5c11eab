//! Scrollable content.

use crate::rect::Rect;
use cgmath::{EuclideanSpace, Point2, Vector2};
use navstack_core::{ContentDimensions, ContentRef, Scrollable};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// A running scroll animation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnimation {
    from: Point2<f64>,
    to: Point2<f64>,
    duration: Duration,
    elapsed: Duration,
}

/// Cubic ease-in-out on `t` in 0...1.
fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4. * t * t * t
    } else {
        let u = 2. * t - 2.;
        0.5 * u * u * u + 1.
    }
}

/// The scroll model of a page’s content area.
///
/// The renderer reports measurements with [`Content::measure`]; they take effect on the next
/// [`Scrollable::resize`], which is also when scroll offsets are clamped to the new bounds.
/// Animated scrolling advances with [`Content::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    /// The visible area.
    frame: Rect,
    /// Size of the scrollable area.
    scroll_size: Vector2<f64>,
    /// Measurements waiting for the next resize.
    pending: Option<(Rect, Vector2<f64>)>,
    offset: Point2<f64>,
    animation: Option<ScrollAnimation>,
}

impl Content {
    pub fn new(frame: Rect, scroll_size: Vector2<f64>) -> Content {
        Content {
            frame,
            scroll_size,
            pending: None,
            offset: Point2::origin(),
            animation: None,
        }
    }

    /// Wraps this content for sharing with a view controller.
    pub fn into_ref(self) -> ContentRef {
        Arc::new(Mutex::new(self))
    }

    /// Records new measurements.
    pub fn measure(&mut self, frame: Rect, scroll_size: Vector2<f64>) {
        self.pending = Some((frame, scroll_size));
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn scroll_offset(&self) -> Point2<f64> {
        self.offset
    }

    /// The largest possible scroll offset along each axis.
    pub fn max_scroll_offset(&self) -> Vector2<f64> {
        Vector2::new(
            (self.scroll_size.x - self.frame.size.x).max(0.),
            (self.scroll_size.y - self.frame.size.y).max(0.),
        )
    }

    fn clamp(&self, point: Point2<f64>) -> Point2<f64> {
        let max = self.max_scroll_offset();
        Point2::new(point.x.max(0.).min(max.x), point.y.max(0.).min(max.y))
    }

    /// Scrolls to the given offset; a zero duration jumps there immediately.
    pub fn scroll_to(&mut self, target: Point2<f64>, duration: Duration) {
        let to = self.clamp(target);
        if duration == Duration::from_secs(0) {
            self.offset = to;
            self.animation = None;
        } else {
            self.animation = Some(ScrollAnimation {
                from: self.offset,
                to,
                duration,
                elapsed: Duration::from_secs(0),
            });
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.animation.is_some()
    }

    /// Advances the scroll animation. Returns true while still scrolling.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let animation = match &mut self.animation {
            Some(animation) => animation,
            None => return false,
        };
        animation.elapsed += elapsed;
        let t = (animation.elapsed.as_secs_f64() / animation.duration.as_secs_f64()).min(1.);
        let (from, to) = (animation.from, animation.to);
        self.offset = from + (to - from) * ease_in_out_cubic(t);
        if t >= 1. {
            self.offset = to;
            self.animation = None;
        }
        self.animation.is_some()
    }
}

impl Scrollable for Content {
    fn scroll_to_top(&mut self, duration: Duration) {
        self.scroll_to(Point2::new(self.offset.x, 0.), duration);
    }

    fn scroll_to_bottom(&mut self, duration: Duration) {
        let bottom = self.max_scroll_offset().y;
        self.scroll_to(Point2::new(self.offset.x, bottom), duration);
    }

    fn resize(&mut self) {
        if let Some((frame, scroll_size)) = self.pending.take() {
            self.frame = frame;
            self.scroll_size = scroll_size;
        }
        self.offset = self.clamp(self.offset);
        let max = self.max_scroll_offset();
        if let Some(animation) = &mut self.animation {
            animation.to = Point2::new(animation.to.x.min(max.x), animation.to.y.min(max.y));
        }
    }

    fn content_dimensions(&self) -> ContentDimensions {
        ContentDimensions {
            content_height: self.frame.size.y,
            content_top: self.frame.min_y(),
            content_bottom: self.frame.max_y(),
            content_width: self.frame.size.x,
            content_left: self.frame.min_x(),
            content_right: self.frame.max_x(),
            scroll_height: self.scroll_size.y,
            scroll_top: self.offset.y,
            scroll_width: self.scroll_size.x,
            scroll_left: self.offset.x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> Content {
        Content::new(
            Rect::new(Point2::new(0., 44.), Vector2::new(320., 480.)),
            Vector2::new(320., 2000.),
        )
    }

    #[test]
    fn dimensions_follow_frame_and_offset() {
        let mut content = phone();
        content.scroll_to(Point2::new(0., 300.), Duration::from_secs(0));
        let dims = content.content_dimensions();
        assert_eq!(dims.content_top, 44.);
        assert_eq!(dims.content_bottom, 524.);
        assert_eq!(dims.content_height, 480.);
        assert_eq!(dims.scroll_height, 2000.);
        assert_eq!(dims.scroll_top, 300.);
        assert_eq!(dims.content_right, 320.);
    }

    #[test]
    fn scroll_to_bottom_animates() {
        let mut content = phone();
        content.scroll_to_bottom(Duration::from_millis(300));
        assert!(content.is_scrolling());
        assert_eq!(content.scroll_offset().y, 0.);

        assert!(content.tick(Duration::from_millis(150)));
        let halfway = content.scroll_offset().y;
        assert!((halfway - 760.).abs() < 1e-9, "eased halfway point, got {}", halfway);

        assert!(!content.tick(Duration::from_millis(200)));
        assert_eq!(content.scroll_offset().y, 1520.);
        assert!(!content.tick(Duration::from_millis(16)));
    }

    #[test]
    fn scroll_to_top_jumps_without_duration() {
        let mut content = phone();
        content.scroll_to_bottom(Duration::from_secs(0));
        content.scroll_to_top(Duration::from_secs(0));
        assert_eq!(content.scroll_offset().y, 0.);
        assert!(!content.is_scrolling());
    }

    #[test]
    fn measurements_apply_on_resize() {
        let mut content = phone();
        content.scroll_to_bottom(Duration::from_secs(0));
        content.measure(content.frame(), Vector2::new(320., 600.));
        assert_eq!(content.content_dimensions().scroll_height, 2000.);

        content.resize();
        let dims = content.content_dimensions();
        assert_eq!(dims.scroll_height, 600.);
        assert_eq!(dims.scroll_top, 120., "offset clamped to the new bottom");
    }

    #[test]
    fn resize_clamps_a_running_scroll() {
        let mut content = phone();
        content.scroll_to_bottom(Duration::from_millis(400));
        content.measure(content.frame(), Vector2::new(320., 680.));
        content.resize();
        assert!(content.is_scrolling());

        assert!(!content.tick(Duration::from_millis(400)));
        assert_eq!(content.scroll_offset().y, 200., "lands on the new bottom");
        assert_eq!(content.content_dimensions().scroll_top, 200.);
    }

    #[test]
    fn shared_content_is_reachable_through_the_trait() {
        let content = phone().into_ref();
        content.lock().scroll_to_bottom(Duration::from_secs(0));
        assert_eq!(content.lock().content_dimensions().scroll_top, 1520.);
    }
}
