pub mod pdf_text;
pub mod settings;
