//! URL adapter: fetches the resource with libcurl.
//!
//! Destination fields come from the URL path: every segment but the last
//! becomes the directory, the last one the filename and extension.

use super::{SourceAdapter, TransferOptions};
use crate::destination::Destination;
use crate::error::{Result, TransferError, UploadError};
use crate::path::{parse_path, sanitize_component};
use crate::source::Source;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Default, Clone, Copy)]
pub struct UrlAdapter;

impl SourceAdapter for UrlAdapter {
    fn detect(&self, source: &Source) -> bool {
        match source {
            Source::Text(s) => parse_absolute(s).is_some(),
            _ => false,
        }
    }

    fn infer_destination(&self, source: &Source) -> Destination {
        match source {
            Source::Text(s) => parse_absolute(s)
                .map(|url| destination_from_url_path(url.path()))
                .unwrap_or_default(),
            _ => Destination::default(),
        }
    }

    fn transfer(&self, source: &Source, destination: &Path, opts: &TransferOptions) -> Result<()> {
        let fail = |cause: TransferError| UploadError::Transfer {
            path: destination.to_path_buf(),
            source: cause,
        };
        let url = match source {
            Source::Text(s) => s.as_str(),
            _ => return Err(fail(TransferError::Malformed("expected a URL".into()))),
        };
        let written = fetch_to_file(url, destination, opts).map_err(fail)?;
        tracing::debug!(url, bytes = written, path = %destination.display(), "fetched URL");
        Ok(())
    }
}

/// Absolute, hierarchical URL (`data:` and `mailto:` style URIs are excluded).
fn parse_absolute(s: &str) -> Option<Url> {
    let url = Url::parse(s).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    if !url.has_host() && url.scheme() != "file" {
        return None;
    }
    Some(url)
}

fn destination_from_url_path(path: &str) -> Destination {
    let decoded = percent_decode(path);
    let parsed = parse_path(&decoded);
    let directory = parsed.directory.and_then(|dir| {
        let segments: Vec<String> = dir
            .split('/')
            .filter_map(sanitize_component)
            .collect();
        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    });
    Destination {
        directory,
        filename: parsed.filename.as_deref().and_then(sanitize_component),
        extension: parsed.extension.as_deref().and_then(sanitize_component),
        prefix: None,
    }
}

/// GETs `url` into a new file at `destination`. Returns the bytes written.
fn fetch_to_file(url: &str, destination: &Path, opts: &TransferOptions) -> std::result::Result<u64, TransferError> {
    let fetch = &opts.fetch;
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(fetch.max_redirections)?;
    easy.connect_timeout(Duration::from_secs(fetch.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(fetch.timeout_secs))?;
    if let Some(agent) = &fetch.user_agent {
        easy.useragent(agent)?;
    }

    let mut file = File::create(destination)?;
    let mut written: u64 = 0;
    let mut write_error: Option<io::Error> = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                tracing::warn!("write to destination failed: {}", e);
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(TransferError::Io(e));
    }
    performed?;
    file.flush()?;

    // file:// and similar schemes report 0.
    let code = easy.response_code()?;
    if code != 0 && !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }
    Ok(written)
}

/// Percent-decodes a URL path; invalid escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.as_bytes().iter().cloned();
    while let Some(b) = bytes.next() {
        if b == b'%' {
            let h = bytes.next();
            let l = bytes.next();
            match (h.and_then(hex_digit), l.and_then(hex_digit)) {
                (Some(high), Some(low)) => out.push(high << 4 | low),
                _ => {
                    out.push(b'%');
                    out.extend(h);
                    out.extend(l);
                }
            }
        } else {
            out.push(b);
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_absolute_urls() {
        let a = UrlAdapter;
        assert!(a.detect(&Source::from("https://example.com/a/b/file.deb")));
        assert!(a.detect(&Source::from("http://127.0.0.1:8080/")));
        assert!(a.detect(&Source::from("file:///tmp/report.pdf")));
        assert!(!a.detect(&Source::from("data:image/png;base64,AAAA")));
        assert!(!a.detect(&Source::from("relative/path.txt")));
        assert!(!a.detect(&Source::from("mailto:a@example.com")));
    }

    #[test]
    fn infers_all_fields_from_path() {
        let d = UrlAdapter.infer_destination(&Source::from(
            "https://cdn.example.com/pool/main/debian-12.ISO?token=abc",
        ));
        assert_eq!(d.directory(), Some("pool/main"));
        assert_eq!(d.filename(), Some("debian-12"));
        assert_eq!(d.extension().as_deref(), Some("iso"));
    }

    #[test]
    fn infers_decoded_segments() {
        let d = UrlAdapter.infer_destination(&Source::from("https://example.com/my%20docs/caf%C3%A9.txt"));
        assert_eq!(d.directory(), Some("my docs"));
        assert_eq!(d.filename(), Some("café"));
    }

    #[test]
    fn encoded_dot_segments_are_dropped() {
        let d = UrlAdapter.infer_destination(&Source::from("https://example.com/a%2F..%2Fb.txt"));
        assert_eq!(d.directory(), Some("a"));
        assert_eq!(d.filename(), Some("b"));
        let traversal = UrlAdapter.infer_destination(&Source::from("https://example.com/%2E%2E/x.txt"));
        assert!(traversal.directory().is_none());
    }

    #[test]
    fn root_url_infers_nothing() {
        let d = UrlAdapter.infer_destination(&Source::from("https://example.com/"));
        assert!(d.directory().is_none());
        assert!(d.filename().is_none());
        assert!(d.extension().is_none());
    }

    #[test]
    fn percent_decode_keeps_invalid_escapes() {
        assert_eq!(percent_decode("a%20b"), "a b");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn transfer_unreachable_host_fails() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let dir = tempfile::tempdir().unwrap();
        let url = format!("http://127.0.0.1:{}/file.bin", port);
        let err = UrlAdapter
            .transfer(&Source::from(url), &dir.path().join("out"), &TransferOptions::default())
            .unwrap_err();
        assert!(matches!(err, UploadError::Transfer { source: TransferError::Curl(_), .. }));
    }
}
