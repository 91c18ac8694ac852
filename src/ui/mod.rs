use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

pub mod chat;
pub mod editor;
pub mod markup;
pub mod modal;
pub mod refine;
pub mod saved;
pub mod schedule;
pub mod sidebar;

/// Read an image file and encode it as a `data:` URI for the title-image
/// fields the server expects.
pub(crate) fn load_image_data_uri(path: &str) -> Result<String, String> {
    let path = Path::new(path.trim());
    let bytes =
        std::fs::read(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::load_image_data_uri;

    #[test]
    fn encodes_file_contents_as_data_uri() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47]).expect("fixture should write");

        let uri = load_image_data_uri(path.to_str().expect("utf-8 path"))
            .expect("encoding should succeed");
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let error = load_image_data_uri("/nonexistent/image.jpg").expect_err("should fail");
        assert!(error.contains("failed to read"));
    }
}
