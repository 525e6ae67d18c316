use std::path::Path;

const ACCEPTED_EXTENSIONS: [&str; 2] = ["txt", "csv"];

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum UploadError {
    #[error("unsupported file type `{0}`, expected a .txt or .csv file")]
    UnsupportedFileType(String),
    #[error("file is larger than {limit} bytes")]
    TooLarge { limit: usize },
    #[error("file is not valid UTF-8 text: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("malformed upload: {0}")]
    Malformed(String),
    #[error("no file was uploaded")]
    Missing,
}

/// Turns an uploaded `.txt` / `.csv` file into the text shown in the URL box.
pub fn decode_upload(file_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => return Err(UploadError::UnsupportedFileType(file_name.to_string())),
    }

    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    Ok(normalize_line_breaks(text).trim().to_string())
}

pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Every line of the submitted text is a candidate, blank ones included.
pub fn split_candidates(text: &str) -> Vec<String> {
    normalize_line_breaks(text)
        .split('\n')
        .map(|line| line.to_string())
        .collect()
}

/// Trimmed, non-blank candidates in the order they were entered.
pub fn non_blank(candidates: &[String]) -> Vec<String> {
    candidates
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_upload_normalizes_windows_line_breaks() {
        let bytes = b"https://a.com\r\nhttps://b.com\r\n\r\n";
        let text = decode_upload("urls.txt", bytes).unwrap();

        assert_eq!(text, "https://a.com\nhttps://b.com");
    }

    #[test]
    fn decode_upload_accepts_csv_in_any_case() {
        let text = decode_upload("Firms.CSV", b"\xef\xbb\xbfhttps://a.com\n").unwrap();

        assert_eq!(text, "https://a.com");
    }

    #[test]
    fn decode_upload_rejects_other_extensions() {
        assert_eq!(
            decode_upload("urls.xlsx", b"https://a.com"),
            Err(UploadError::UnsupportedFileType("urls.xlsx".to_string()))
        );
        assert!(decode_upload("urls", b"https://a.com").is_err());
    }

    #[test]
    fn decode_upload_rejects_binary_content() {
        let result = decode_upload("urls.txt", &[0x68, 0x74, 0xff, 0xfe]);

        assert!(matches!(result, Err(UploadError::NotUtf8(_))));
    }

    #[test]
    fn split_candidates_keeps_blank_lines_and_order() {
        let candidates = split_candidates("https://b.com\r\n\r\n  https://a.com  \nhttps://b.com");

        assert_eq!(
            candidates,
            vec!["https://b.com", "", "  https://a.com  ", "https://b.com"]
        );
    }

    #[test]
    fn non_blank_trims_and_keeps_duplicates() {
        let candidates = split_candidates(" https://b.com \n   \nhttps://a.com\nhttps://b.com\n");

        assert_eq!(
            non_blank(&candidates),
            vec!["https://b.com", "https://a.com", "https://b.com"]
        );
    }
}
