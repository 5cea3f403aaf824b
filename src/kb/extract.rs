use std::path::Path;

/// Extract searchable text from a source document.
///
/// Supports PDF (best-effort, two extraction attempts), plain text and
/// markdown (direct read), and JSON (pretty-printed re-serialization).
/// Never fails past this boundary: unsupported extensions and unreadable
/// files return an empty string, which the caller treats as an ingestion
/// failure for that one document.
pub fn extract_text(path: &Path) -> String {
    if !path.exists() {
        return String::new();
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => extract_pdf(path),
        "txt" | "md" => std::fs::read_to_string(path).unwrap_or_default(),
        "json" => extract_json(path),
        _ => {
            tracing::warn!(path = %path.display(), "unsupported document extension");
            String::new()
        }
    }
}

/// Best-effort PDF extraction: try the layout-aware path-based extractor
/// first, then re-attempt from raw bytes before giving up.
fn extract_pdf(path: &Path) -> String {
    match pdf_extract::extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "primary PDF extraction failed");
            std::fs::read(path)
                .ok()
                .and_then(|bytes| pdf_extract::extract_text_from_mem(&bytes).ok())
                .unwrap_or_default()
        }
    }
}

/// Re-serialize JSON so nested values become searchable text.
fn extract_json(path: &Path) -> String {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return String::new(),
    };

    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid JSON document");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_empty_text() {
        let text = extract_text(Path::new("/nonexistent/report.txt"));
        assert!(text.is_empty());
    }

    #[test]
    fn test_plain_text_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.txt");
        std::fs::write(&path, "Fixed deposit rates are reviewed quarterly.").unwrap();

        let text = extract_text(&path);
        assert_eq!(text, "Fixed deposit rates are reviewed quarterly.");
    }

    #[test]
    fn test_json_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.json");
        std::fs::write(&path, r#"{"question":"What is an EMI?","answer":"A monthly installment."}"#)
            .unwrap();

        let text = extract_text(&path);
        assert!(text.contains("What is an EMI?"));
        assert!(text.contains('\n'), "expected pretty-printed output");
    }

    #[test]
    fn test_invalid_json_yields_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(extract_text(&path).is_empty());
    }

    #[test]
    fn test_unsupported_extension_yields_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.xlsx");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"binary").unwrap();

        assert!(extract_text(&path).is_empty());
    }
}
