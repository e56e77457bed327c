use gtk::gio;
use gtk::glib;
use gtk::prelude::*;
use gtk::subclass::prelude::*;
use gtk::{ApplicationWindow, HeaderBar, Label};
use pdfium_render::prelude::*;
use tracing::debug;

use crate::modes::{KeyAction, KeyResult, handle_reader_key};
use crate::services::settings::Settings;
use crate::widgets::ReaderView;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct ReaderWindow {
        pub header_bar: HeaderBar,
        pub title_label: Label,
        pub page_label: Label,
        pub reader_view: ReaderView,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ReaderWindow {
        const NAME: &'static str = "FingertipReaderWindow";
        type Type = super::ReaderWindow;
        type ParentType = ApplicationWindow;
    }

    impl ObjectImpl for ReaderWindow {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_widgets();
        }
    }

    impl WidgetImpl for ReaderWindow {}
    impl WindowImpl for ReaderWindow {}
    impl ApplicationWindowImpl for ReaderWindow {}
}

glib::wrapper! {
    pub struct ReaderWindow(ObjectSubclass<imp::ReaderWindow>)
        @extends ApplicationWindow, gtk::Window, gtk::Widget,
        @implements gio::ActionGroup, gio::ActionMap, gtk::Accessible, gtk::Buildable,
                    gtk::ConstraintTarget, gtk::Native, gtk::Root, gtk::ShortcutManager;
}

impl ReaderWindow {
    pub fn new(app: &gtk::Application, title: &str) -> Self {
        let window: Self = glib::Object::builder()
            .property("application", app)
            .property("title", title)
            .property("default-width", 1000)
            .property("default-height", 800)
            .build();

        window.imp().title_label.set_label(title);
        window
    }

    fn setup_widgets(&self) {
        let imp = self.imp();

        imp.title_label.add_css_class("title");
        imp.page_label.add_css_class("dim-label");
        imp.header_bar.set_title_widget(Some(&imp.title_label));
        imp.header_bar.set_show_title_buttons(true);
        imp.header_bar.pack_end(&imp.page_label);
        self.set_titlebar(Some(&imp.header_bar));

        self.set_child(Some(&imp.reader_view));

        self.setup_cursor_tracking();
        self.setup_keyboard_controller();
    }

    fn setup_cursor_tracking(&self) {
        let window_weak = self.downgrade();
        self.imp().reader_view.connect_closure(
            "cursor-moved",
            false,
            glib::closure_local!(
                move |_view: &ReaderView, index: u32, page_changed: bool, direction: i32| {
                    debug!(index, page_changed, direction, "cursor-moved");
                    if page_changed && let Some(window) = window_weak.upgrade() {
                        window.update_page_label();
                    }
                }
            ),
        );
    }

    fn setup_keyboard_controller(&self) {
        let controller = gtk::EventControllerKey::new();
        // Arrow keys would otherwise scroll the scrolled window before reaching us
        controller.set_propagation_phase(gtk::PropagationPhase::Capture);
        let window_weak = self.downgrade();

        controller.connect_key_pressed(move |_, key, _, modifiers| {
            let Some(window) = window_weak.upgrade() else {
                return glib::Propagation::Proceed;
            };

            match handle_reader_key(key, modifiers) {
                KeyResult::Action(action) => {
                    window.execute_action(action);
                    glib::Propagation::Stop
                }
                KeyResult::Unhandled => glib::Propagation::Proceed,
            }
        });

        self.add_controller(controller);
    }

    fn execute_action(&self, action: KeyAction) {
        match action {
            KeyAction::MoveCursor(direction) => self.imp().reader_view.move_cursor(direction),
            KeyAction::Close => self.close(),
        }
    }

    /// Hand the document to the view and show where the cursor starts
    pub fn load_document(&self, document: PdfDocument<'static>, settings: Settings) {
        self.imp().reader_view.load_document(document, settings);
        self.update_page_label();
    }

    fn update_page_label(&self) {
        let view = &self.imp().reader_view;
        let text = match (view.shown_page(), view.cursor()) {
            (Some(page), Some(_)) => format!("page {} / {}", page + 1, view.page_count()),
            (Some(page), None) => format!("page {} / {} (no text)", page + 1, view.page_count()),
            (None, _) => String::new(),
        };
        self.imp().page_label.set_label(&text);
    }
}
