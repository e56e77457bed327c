use gtk::glib;
use gtk::prelude::*;
use gtk::subclass::prelude::*;
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Top-left corner of the marker in page pixels
pub type MarkerPoint = (f64, f64);

pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// One glide of the marker between two points, sampled on frame clock time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerMotion {
    from: MarkerPoint,
    to: MarkerPoint,
    duration_us: i64,
    /// Frame time of the first sample
    started_us: Option<i64>,
}

impl MarkerMotion {
    pub fn new(from: MarkerPoint, to: MarkerPoint, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration_us: (duration.as_micros() as i64).max(1),
            started_us: None,
        }
    }

    /// Position at `now_us` and whether the glide is over
    pub fn sample(&mut self, now_us: i64) -> (MarkerPoint, bool) {
        let start = *self.started_us.get_or_insert(now_us);
        let t = ((now_us - start) as f64 / self.duration_us as f64).clamp(0.0, 1.0);
        let eased = ease_out_cubic(t);

        let x = self.from.0 + (self.to.0 - self.from.0) * eased;
        let y = self.from.1 + (self.to.1 - self.from.1) * eased;
        ((x, y), t >= 1.0)
    }
}

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct FingerOverlay {
        pub position: Cell<Option<MarkerPoint>>,
        pub marker_size: Cell<f64>,
        pub motion: RefCell<Option<MarkerMotion>>,
        pub tick_id: RefCell<Option<gtk::TickCallbackId>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for FingerOverlay {
        const NAME: &'static str = "FingertipFingerOverlay";
        type Type = super::FingerOverlay;
        type ParentType = gtk::DrawingArea;
    }

    impl ObjectImpl for FingerOverlay {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_drawing();
        }
    }

    impl WidgetImpl for FingerOverlay {}
    impl DrawingAreaImpl for FingerOverlay {}
}

glib::wrapper! {
    /// Transparent layer above the page picture that paints the finger marker.
    pub struct FingerOverlay(ObjectSubclass<imp::FingerOverlay>)
        @extends gtk::DrawingArea, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget;
}

impl FingerOverlay {
    pub fn new() -> Self {
        glib::Object::builder().build()
    }

    fn setup_drawing(&self) {
        // Clicks go through to the page
        self.set_can_target(false);

        let overlay_weak = self.downgrade();
        self.set_draw_func(move |_area, cr, _width, _height| {
            if let Some(overlay) = overlay_weak.upgrade() {
                overlay.draw(cr);
            }
        });
    }

    fn draw(&self, cr: &gtk::cairo::Context) {
        let Some((x, y)) = self.imp().position.get() else {
            return;
        };
        let size = self.imp().marker_size.get();
        if size <= 0.0 {
            return;
        }

        let center = x + size / 2.0;
        let tip_height = size * 0.35;
        let body_width = size * 0.5;
        let body_left = center - body_width / 2.0;
        let radius = body_width / 2.0;

        // Pointer triangle, tip touching the glyph's bottom edge
        cr.move_to(center, y);
        cr.line_to(x + size * 0.8, y + tip_height);
        cr.line_to(x + size * 0.2, y + tip_height);
        cr.close_path();

        // Finger body with a rounded end
        cr.rectangle(body_left, y + tip_height, body_width, size - tip_height - radius);
        cr.new_sub_path();
        cr.arc(
            center,
            y + size - radius,
            radius,
            0.0,
            std::f64::consts::PI,
        );
        cr.close_path();

        cr.set_source_rgba(0.95, 0.55, 0.15, 0.85);
        let _ = cr.fill_preserve();

        cr.set_source_rgba(0.45, 0.2, 0.05, 0.9);
        cr.set_line_width(1.5);
        let _ = cr.stroke();
    }

    pub fn set_marker_size(&self, size: f64) {
        self.imp().marker_size.set(size);
        self.queue_draw();
    }

    pub fn marker_size(&self) -> f64 {
        self.imp().marker_size.get()
    }

    /// Current on-screen position, mid-glide included
    pub fn position(&self) -> Option<MarkerPoint> {
        self.imp().position.get()
    }

    fn set_position(&self, position: Option<MarkerPoint>) {
        self.imp().position.set(position);
        self.queue_draw();
    }

    /// Jump straight to `target`, dropping any glide in progress
    pub fn place(&self, target: MarkerPoint) {
        self.cancel_glide();
        self.set_position(Some(target));
    }

    /// Hide the marker
    pub fn clear(&self) {
        self.cancel_glide();
        self.set_position(None);
    }

    /// Glide from the current position to `target`.
    /// A glide already running is cancelled and the new one starts where the marker is now.
    pub fn glide_to(&self, target: MarkerPoint, duration: Duration) {
        self.cancel_glide();

        let Some(from) = self.position() else {
            self.set_position(Some(target));
            return;
        };

        self.imp()
            .motion
            .replace(Some(MarkerMotion::new(from, target, duration)));

        let id = self.add_tick_callback(|overlay, clock| {
            let frame_time = clock.frame_time();
            let sample = overlay
                .imp()
                .motion
                .borrow_mut()
                .as_mut()
                .map(|motion| motion.sample(frame_time));

            match sample {
                Some((position, finished)) => {
                    overlay.set_position(Some(position));
                    if finished {
                        overlay.imp().motion.replace(None);
                        // Returning Break removes the callback; the stored id is stale now
                        overlay.imp().tick_id.take();
                        glib::ControlFlow::Break
                    } else {
                        glib::ControlFlow::Continue
                    }
                }
                None => glib::ControlFlow::Break,
            }
        });

        self.imp().tick_id.replace(Some(id));
    }

    /// Stop a running glide, leaving the marker where it currently is
    pub fn cancel_glide(&self) {
        if let Some(id) = self.imp().tick_id.take() {
            id.remove();
        }
        self.imp().motion.replace(None);
    }
}

impl Default for FingerOverlay {
    fn default() -> Self {
        Self::new()
    }
}
