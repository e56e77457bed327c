use std::path::PathBuf;

use pdfium_render::prelude::PdfiumError;
use thiserror::Error;

/// Errors that stop the reader from starting or from showing a page
#[derive(Debug, Error)]
pub enum FingertipError {
    #[error("could not bind to the PDFium library: {0}")]
    PdfiumBinding(#[source] PdfiumError),

    #[error("failed to open {}: {source}", path.display())]
    DocumentLoad {
        path: PathBuf,
        #[source]
        source: PdfiumError,
    },

    #[error("failed to render page {page}: {source}")]
    PageRender {
        page: usize,
        #[source]
        source: PdfiumError,
    },

    #[error("page {0} does not exist")]
    PageOutOfRange(usize),

    #[error("failed to read settings from {}: {source}", path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings in {}: {source}", path.display())]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, FingertipError>;
