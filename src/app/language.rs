use std::path::Path;

/// Coarse language id, derived once from the file extension at creation or
/// rename. Drives grammar selection in the highlight adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Python,
    Dart,
    Unknown,
}

impl Language {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("c") | Some("h") => Language::C,
            Some("py") => Language::Python,
            Some("dart") => Language::Dart,
            _ => Language::Unknown,
        }
    }
}
