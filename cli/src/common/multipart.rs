//! # zipconv Multipart Body Parser (`common::multipart`)
//!
//! File: cli/src/common/multipart.rs
//!
//! ## Overview
//!
//! A deliberately small parser for `multipart/form-data` bodies carrying a single
//! file. It does not implement the multipart grammar; it works on CRLF-separated
//! lines:
//!
//! 1. Split the body on CRLF.
//! 2. Drop the first line (the opening `--boundary` delimiter).
//! 3. Drop a trailing empty line if present, then drop the closing
//!    `--boundary--` delimiter.
//! 4. The first empty line separates the part headers from the part content.
//! 5. Headers and content are re-joined with CRLF. Re-inserting CRLF is what
//!    keeps binary content intact.
//! 6. The file name is the `filename="..."` attribute of the header block.
//!
//! Only the first part is looked at. Enforcing "exactly one part" is up to the
//! caller, using `count_parts`.
//!
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const CRLF: &[u8] = b"\r\n";

static FILENAME_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename="(.+)""#).expect("filename pattern is valid"));

/// File name and content extracted from an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultipartError {
    #[error("no empty line separates the part headers from its content")]
    MalformedBody,

    #[error("no filename attribute in the part headers")]
    MissingFilename,
}

/// Splits `body` on every CRLF. Like a plain byte split, a trailing CRLF yields a
/// final empty line and an empty body yields a single empty line.
fn split_lines(body: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut index = 0;
    while index + CRLF.len() <= body.len() {
        if &body[index..index + CRLF.len()] == CRLF {
            lines.push(&body[start..index]);
            index += CRLF.len();
            start = index;
        } else {
            index += 1;
        }
    }
    lines.push(&body[start..]);
    lines
}

fn join_lines(lines: &[&[u8]]) -> Vec<u8> {
    lines.join(CRLF)
}

/// # Parse Upload (`parse_upload`)
///
/// Extracts the file name and content of the first part of a multipart body.
///
/// ## Errors
///
/// - `MalformedBody` if no empty line separates headers from content.
/// - `MissingFilename` if the headers carry no `filename="..."` attribute.
pub fn parse_upload(body: &[u8]) -> Result<ParsedUpload, MultipartError> {
    let mut lines = split_lines(body);

    // Opening delimiter.
    lines.remove(0);
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    // Closing delimiter.
    lines.pop();

    let separator = lines
        .iter()
        .position(|line| line.is_empty())
        .ok_or(MultipartError::MalformedBody)?;

    let headers = join_lines(&lines[..separator]);
    let headers = String::from_utf8_lossy(&headers);
    let content = join_lines(&lines[separator + 1..]);

    let file_name = FILENAME_ATTRIBUTE
        .captures(&headers)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str().to_string())
        .ok_or(MultipartError::MissingFilename)?;

    Ok(ParsedUpload { file_name, content })
}

/// # Boundary From Content-Type (`boundary_from_content_type`)
///
/// Reads the `boundary` parameter of a `multipart/form-data` content type. Quoted
/// and bare values are accepted. Returns `None` for other media types or when the
/// parameter is missing or empty.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    let mut params = content_type.split(';');
    let media_type = params.next()?.trim();
    if !media_type.eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }

    params
        .filter_map(|param| param.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|boundary| !boundary.is_empty())
}

/// Number of parts in `body`: lines equal to the opening delimiter `--boundary`.
pub fn count_parts(body: &[u8], boundary: &str) -> usize {
    let delimiter = format!("--{}", boundary);
    split_lines(body)
        .into_iter()
        .filter(|line| *line == delimiter.as_bytes())
        .count()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "------------------------d540825227eb0374";

    fn multipart_body(file_name: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(b""), vec![b"" as &[u8]]);
        assert_eq!(split_lines(b"a\r\nb"), vec![b"a" as &[u8], b"b"]);
        assert_eq!(split_lines(b"a\r\n"), vec![b"a" as &[u8], b""]);
        // A lone CR or LF is content, not a terminator.
        assert_eq!(split_lines(b"a\nb\rc"), vec![b"a\nb\rc" as &[u8]]);
    }

    #[test]
    fn test_parse_simple_upload() {
        let body = multipart_body("notes.txt", b"hello");
        let upload = parse_upload(&body).expect("valid body");
        assert_eq!(upload.file_name, "notes.txt");
        assert_eq!(upload.content, b"hello");
    }

    #[test]
    fn test_parse_preserves_crlf_in_content() {
        let content = b"line one\r\nline two\r\n\r\nafter blank\r\n";
        let body = multipart_body("lines.txt", content);
        let upload = parse_upload(&body).expect("valid body");
        assert_eq!(upload.content, content);
    }

    #[test]
    fn test_parse_binary_content() {
        let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let body = multipart_body("large-file.bin", &content);
        let upload = parse_upload(&body).expect("valid body");
        assert_eq!(upload.content, content);
    }

    #[test]
    fn test_parse_empty_file() {
        let body = multipart_body("text-empty.txt", b"");
        let upload = parse_upload(&body).expect("valid body");
        assert_eq!(upload.file_name, "text-empty.txt");
        assert!(upload.content.is_empty());
    }

    #[test]
    fn test_parse_without_trailing_line() {
        let mut body = multipart_body("notes.txt", b"hello");
        body.truncate(body.len() - CRLF.len());
        let upload = parse_upload(&body).expect("tolerates missing trailing CRLF");
        assert_eq!(upload.content, b"hello");
    }

    #[test]
    fn test_parse_no_separator() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\nhello\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        assert_eq!(
            parse_upload(body.as_bytes()),
            Err(MultipartError::MalformedBody)
        );
        assert_eq!(parse_upload(b""), Err(MultipartError::MalformedBody));
    }

    #[test]
    fn test_parse_missing_filename() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"comment\"\r\n\r\nhello\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        assert_eq!(
            parse_upload(body.as_bytes()),
            Err(MultipartError::MissingFilename)
        );
    }

    #[test]
    fn test_boundary_from_content_type() {
        assert_eq!(
            boundary_from_content_type("multipart/form-data; boundary=abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(
            boundary_from_content_type("Multipart/Form-Data; charset=utf-8; boundary=\"q r\""),
            Some("q r".to_string())
        );
        assert_eq!(boundary_from_content_type("multipart/form-data"), None);
        assert_eq!(boundary_from_content_type("multipart/form-data; boundary="), None);
        assert_eq!(boundary_from_content_type("application/json; boundary=x"), None);
    }

    #[test]
    fn test_count_parts() {
        let single = multipart_body("a.txt", b"a");
        assert_eq!(count_parts(&single, BOUNDARY), 1);

        let mut double = single.clone();
        // Replace the closing delimiter with a second part.
        double.truncate(double.len() - format!("--{}--\r\n", BOUNDARY).len());
        double.extend_from_slice(&multipart_body("b.txt", b"b"));
        assert_eq!(count_parts(&double, BOUNDARY), 2);

        assert_eq!(count_parts(b"no parts here", BOUNDARY), 0);
    }
}
