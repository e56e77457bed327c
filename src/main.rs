mod error;
mod modes;
mod services;
mod text_map;
mod widgets;

use clap::Parser;
use gtk::prelude::*;
use gtk::{Application, gio, glib};
use pdfium_render::prelude::PdfDocument;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::services::pdf_text;
use crate::services::settings::Settings;
use crate::widgets::ReaderWindow;

const APP_ID: &str = "org.gtk_rs.fingertip";

/// Follow a PDF glyph by glyph with an animated finger.
/// Arrow keys or hjkl move the finger, q or Escape quits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// PDF document to read
    path: PathBuf,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fingertip=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn open_document(path: &Path, settings: &Settings) -> error::Result<PdfDocument<'static>> {
    let pdfium = pdf_text::bind_pdfium(settings.pdfium_library.as_deref())?;
    pdf_text::load_document(pdfium, path)
}

fn window_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fingertip".to_string())
}

fn main() -> glib::ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load();

    // Nothing to show without a document
    let document = match open_document(&cli.path, &settings) {
        Ok(doc) => doc,
        Err(e) => {
            error!("{e}");
            return glib::ExitCode::FAILURE;
        }
    };

    let app = Application::builder()
        .application_id(APP_ID)
        .flags(gio::ApplicationFlags::NON_UNIQUE)
        .build();

    let title = window_title(&cli.path);
    let pending = Rc::new(RefCell::new(Some(document)));

    app.connect_activate(move |app| {
        let Some(document) = pending.borrow_mut().take() else {
            if let Some(window) = app.active_window() {
                window.present();
            }
            return;
        };

        let window = ReaderWindow::new(app, &title);
        window.load_document(document, settings.clone());
        window.present();
    });

    // Arguments were already consumed by clap
    let program = std::env::args().next().unwrap_or_else(|| "fingertip".to_string());
    app.run_with_args(&[program])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_takes_a_single_path() {
        let cli = Cli::try_parse_from(["fingertip", "book.pdf"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("book.pdf"));
    }

    #[test]
    fn test_cli_requires_a_path() {
        assert!(Cli::try_parse_from(["fingertip"]).is_err());
        assert!(Cli::try_parse_from(["fingertip", "a.pdf", "--zoom", "2"]).is_err());
    }

    #[test]
    fn test_window_title_uses_file_name() {
        assert_eq!(window_title(Path::new("/tmp/docs/paper.pdf")), "paper.pdf");
        assert_eq!(window_title(Path::new("/")), "fingertip");
    }
}
