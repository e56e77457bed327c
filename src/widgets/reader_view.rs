use glib::subclass::Signal;
use gtk::glib;
use gtk::prelude::*;
use gtk::subclass::prelude::*;
use gtk::{Align, Box, Orientation, Overlay, Picture, PolicyType, ScrolledWindow};
use pdfium_render::prelude::*;
use std::cell::{Cell, RefCell};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::services::pdf_text::{self, RenderedPage};
use crate::services::settings::Settings;
use crate::text_map::{CursorMoved, GlyphBounds, NavDirection, Navigator};
use crate::widgets::finger_overlay::{FingerOverlay, MarkerPoint};

/// Edge of the page the viewport snaps to after a page change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEdge {
    Top,
    Bottom,
}

impl ScrollEdge {
    /// Entering a page forward shows its top, entering backward shows its bottom
    pub fn for_direction(direction: i32) -> Self {
        if direction < 0 {
            ScrollEdge::Bottom
        } else {
            ScrollEdge::Top
        }
    }
}

/// Marker origin for a glyph: centered under the glyph, top at its bottom edge
pub fn marker_origin(bounds: &GlyphBounds, scale: f64, marker_size: f64) -> MarkerPoint {
    (
        bounds.center_x() * scale - marker_size / 2.0,
        bounds.y1 * scale,
    )
}

/// New scroll value that keeps the marker a line away from the viewport edges,
/// or None when it is comfortably inside
pub fn linewise_scroll_value(
    value: f64,
    page_size: f64,
    marker_top: f64,
    marker_height: f64,
    margin: f64,
) -> Option<f64> {
    let view_top = value;
    let view_bottom = value + page_size;

    if marker_top + marker_height > view_bottom - margin {
        Some(value + marker_height)
    } else if marker_top < view_top + margin {
        Some(value - marker_height)
    } else {
        None
    }
}

/// A changed page height reaches the adjustment only after layout, so the edge
/// snap has to be repeated then. An unchanged height never triggers that update.
fn snap_waits_for_layout(previous_height: i32, new_height: i32) -> bool {
    previous_height != new_height
}

fn clamp_scroll(value: f64, lower: f64, upper: f64, page_size: f64) -> f64 {
    let max_value = (upper - page_size).max(lower);
    value.clamp(lower, max_value)
}

mod imp {
    use super::*;

    pub struct ReaderView {
        pub scrolled: ScrolledWindow,
        pub picture: Picture,
        pub finger: FingerOverlay,
        pub document: RefCell<Option<PdfDocument<'static>>>,
        pub navigator: RefCell<Navigator>,
        pub settings: RefCell<Settings>,
        pub shown_page: Cell<Option<usize>>,
        /// Pixels per point of the page on screen
        pub page_scale: Cell<f64>,
        /// Edge to snap to once the adjustment reports the new page height
        pub pending_edge: Cell<Option<ScrollEdge>>,
    }

    impl Default for ReaderView {
        fn default() -> Self {
            Self {
                scrolled: ScrolledWindow::new(),
                picture: Picture::new(),
                finger: FingerOverlay::new(),
                document: RefCell::new(None),
                navigator: RefCell::new(Navigator::default()),
                settings: RefCell::new(Settings::default()),
                shown_page: Cell::new(None),
                page_scale: Cell::new(1.0),
                pending_edge: Cell::new(None),
            }
        }
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ReaderView {
        const NAME: &'static str = "FingertipReaderView";
        type Type = super::ReaderView;
        type ParentType = Box;
    }

    impl ObjectImpl for ReaderView {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_widgets();
        }

        fn signals() -> &'static [Signal] {
            static SIGNALS: OnceLock<Vec<Signal>> = OnceLock::new();
            SIGNALS.get_or_init(|| {
                vec![Signal::builder("cursor-moved")
                    .param_types([
                        u32::static_type(),
                        bool::static_type(),
                        i32::static_type(),
                    ])
                    .build()]
            })
        }
    }

    impl WidgetImpl for ReaderView {}
    impl BoxImpl for ReaderView {}
}

glib::wrapper! {
    /// Shows the page under the cursor with the finger marker on top of it.
    ///
    /// Emits `cursor-moved(index: u32, page_changed: bool, direction: i32)` after
    /// every key press that moved the cursor.
    pub struct ReaderView(ObjectSubclass<imp::ReaderView>)
        @extends Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl ReaderView {
    pub fn new() -> Self {
        glib::Object::builder().build()
    }

    fn setup_widgets(&self) {
        let imp = self.imp();
        self.set_orientation(Orientation::Vertical);

        imp.picture.set_can_shrink(false);
        imp.picture.set_halign(Align::Start);
        imp.picture.set_valign(Align::Start);

        let overlay = Overlay::new();
        overlay.set_halign(Align::Center);
        overlay.set_valign(Align::Start);
        overlay.set_child(Some(&imp.picture));
        overlay.add_overlay(&imp.finger);

        imp.scrolled.set_hscrollbar_policy(PolicyType::Never);
        imp.scrolled.set_vscrollbar_policy(PolicyType::Always);
        imp.scrolled.set_vexpand(true);
        imp.scrolled.set_hexpand(true);
        imp.scrolled.set_child(Some(&overlay));
        self.append(&imp.scrolled);

        self.setup_scroll_tracking();
    }

    /// Re-apply a pending edge snap once the adjustment knows the new page height
    fn setup_scroll_tracking(&self) {
        let view_weak = self.downgrade();
        self.imp()
            .scrolled
            .vadjustment()
            .connect_changed(move |_| {
                if let Some(view) = view_weak.upgrade()
                    && let Some(edge) = view.imp().pending_edge.take()
                {
                    view.scroll_to_edge(edge);
                }
            });
    }

    /// Take ownership of a loaded document, index its glyphs and show the first one
    pub fn load_document(&self, document: PdfDocument<'static>, settings: Settings) {
        let imp = self.imp();

        let glyphs = pdf_text::extract_glyphs(&document);
        let navigator = Navigator::new(glyphs);
        info!(
            glyphs = navigator.glyph_count(),
            lines = navigator.line_index().len(),
            "line index built"
        );
        if navigator.line_index().is_empty() {
            warn!("document has no extractable text, the finger stays hidden");
        }

        let marker_size = settings.marker_size_px(self.monitor_width());
        debug!(marker_size, "marker size");
        imp.finger.set_marker_size(marker_size as f64);
        imp.settings.replace(settings);
        imp.document.replace(Some(document));

        let first_page = navigator.current_glyph().map_or(0, |glyph| glyph.page);
        imp.navigator.replace(navigator);
        imp.shown_page.set(None);

        self.enter_page(first_page, ScrollEdge::Top);

        match self.cursor_marker_target() {
            Some(target) => imp.finger.place(target),
            None => imp.finger.clear(),
        }
    }

    /// Move the cursor and, when it actually moved, update the page, the scroll
    /// position and the marker, then emit `cursor-moved`
    pub fn move_cursor(&self, direction: NavDirection) {
        let moved = self.imp().navigator.borrow_mut().navigate(direction);

        // No-ops leave the screen alone
        let Some(moved) = moved else {
            return;
        };

        self.present_move(&moved);
        self.emit_by_name::<()>(
            "cursor-moved",
            &[&(moved.index as u32), &moved.page_changed, &moved.direction],
        );
    }

    fn present_move(&self, moved: &CursorMoved) {
        let imp = self.imp();
        imp.pending_edge.set(None);

        if moved.page_changed {
            // The marker glides in from where it was on the previous page
            self.enter_page(moved.page, ScrollEdge::for_direction(moved.direction));
        }

        let Some(target) = self.cursor_marker_target() else {
            return;
        };

        let duration = Duration::from_millis(imp.settings.borrow().animation_ms);
        imp.finger.glide_to(target, duration);

        if !moved.page_changed {
            self.ensure_marker_visible(target);
        }
    }

    /// Show `page_index` and snap the viewport to `edge` of it
    fn enter_page(&self, page_index: usize, edge: ScrollEdge) {
        let imp = self.imp();
        imp.pending_edge.set(None);
        let previous_height = imp.picture.size_request().1;

        if let Err(e) = self.show_page(page_index) {
            error!("{e}");
        }

        self.scroll_to_edge(edge);
        if snap_waits_for_layout(previous_height, imp.picture.size_request().1) {
            imp.pending_edge.set(Some(edge));
        }
    }

    /// Logical width and physical width in millimetres of the monitor showing
    /// the view, or of the first monitor before the view is mapped
    fn monitor_width(&self) -> Option<(i32, i32)> {
        let display = self.display();
        let monitor = self
            .native()
            .and_then(|native| native.surface())
            .and_then(|surface| display.monitor_at_surface(&surface))
            .or_else(|| display.monitors().item(0).and_downcast::<gtk::gdk::Monitor>())?;

        Some((monitor.geometry().width(), monitor.width_mm()))
    }

    fn cursor_marker_target(&self) -> Option<MarkerPoint> {
        let imp = self.imp();
        let navigator = imp.navigator.borrow();
        let glyph = navigator.current_glyph()?;
        Some(marker_origin(
            &glyph.bounds,
            imp.page_scale.get(),
            imp.finger.marker_size(),
        ))
    }

    /// Render `page_index` into the picture unless it is already shown
    fn show_page(&self, page_index: usize) -> Result<()> {
        let imp = self.imp();
        if imp.shown_page.get() == Some(page_index) {
            return Ok(());
        }

        let rendered = {
            let doc_borrow = imp.document.borrow();
            let Some(doc) = doc_borrow.as_ref() else {
                return Ok(());
            };
            if pdf_text::page_count(doc) == 0 {
                return Ok(());
            }
            let scale = imp.settings.borrow().render_scale;
            pdf_text::render_page(doc, page_index, scale)?
        };

        self.apply_rendered_page(&rendered);
        Ok(())
    }

    fn apply_rendered_page(&self, rendered: &RenderedPage) {
        let imp = self.imp();
        let texture = self.create_texture_from_bitmap(rendered);

        imp.picture.set_paintable(Some(&texture));
        imp.picture
            .set_size_request(rendered.config.width, rendered.config.height);
        imp.finger.set_content_width(rendered.config.width);
        imp.finger.set_content_height(rendered.config.height);

        imp.page_scale.set(rendered.scale);
        imp.shown_page.set(Some(rendered.page_index));

        debug!(page = rendered.page_index, "page shown");
    }

    fn create_texture_from_bitmap(&self, rendered: &RenderedPage) -> gtk::gdk::MemoryTexture {
        let bytes_glib = glib::Bytes::from(&rendered.pixels);

        gtk::gdk::MemoryTexture::new(
            rendered.config.width,
            rendered.config.height,
            gtk::gdk::MemoryFormat::B8g8r8a8,
            &bytes_glib,
            rendered.config.stride,
        )
    }

    fn scroll_to_edge(&self, edge: ScrollEdge) {
        let adjustment = self.imp().scrolled.vadjustment();
        let value = match edge {
            ScrollEdge::Top => adjustment.lower(),
            ScrollEdge::Bottom => adjustment.upper() - adjustment.page_size(),
        };
        adjustment.set_value(clamp_scroll(
            value,
            adjustment.lower(),
            adjustment.upper(),
            adjustment.page_size(),
        ));
    }

    /// Scroll by one marker height when the marker gets within the margin of an edge
    fn ensure_marker_visible(&self, target: MarkerPoint) {
        let imp = self.imp();
        let adjustment = imp.scrolled.vadjustment();
        let margin = imp.settings.borrow().scroll_margin;

        if let Some(value) = linewise_scroll_value(
            adjustment.value(),
            adjustment.page_size(),
            target.1,
            imp.finger.marker_size(),
            margin,
        ) {
            adjustment.set_value(clamp_scroll(
                value,
                adjustment.lower(),
                adjustment.upper(),
                adjustment.page_size(),
            ));
        }
    }

    /// Current cursor glyph index, None for a document without text
    pub fn cursor(&self) -> Option<usize> {
        self.imp().navigator.borrow().cursor()
    }

    pub fn shown_page(&self) -> Option<usize> {
        self.imp().shown_page.get()
    }

    pub fn page_count(&self) -> usize {
        self.imp()
            .document
            .borrow()
            .as_ref()
            .map_or(0, pdf_text::page_count)
    }
}

impl Default for ReaderView {
    fn default() -> Self {
        Self::new()
    }
}
