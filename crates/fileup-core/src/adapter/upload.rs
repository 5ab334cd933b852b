//! Adapter for multipart upload descriptors (`name`, `tmp_name`, `error`).

use super::{infer_from_client_name, SourceAdapter, TransferOptions};
use crate::destination::Destination;
use crate::error::{Result, TransferError, UploadError};
use crate::source::{error_code, move_file, Source};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct UploadAdapter;

impl SourceAdapter for UploadAdapter {
    fn detect(&self, source: &Source) -> bool {
        // a null tmp_name counts as absent
        matches!(source, Source::Fields(fields) if fields.get("tmp_name").is_some_and(|v| !v.is_null()))
    }

    fn infer_destination(&self, source: &Source) -> Destination {
        let name = match source {
            Source::Fields(fields) => fields.get("name").and_then(|v| v.as_str()),
            _ => None,
        };
        name.map(infer_from_client_name).unwrap_or_default()
    }

    fn transfer(&self, source: &Source, destination: &Path, opts: &TransferOptions) -> Result<()> {
        let fail = |cause: TransferError| UploadError::Transfer {
            path: destination.to_path_buf(),
            source: cause,
        };

        let fields = match source {
            Source::Fields(fields) => fields,
            _ => return Err(fail(TransferError::Malformed("expected an upload descriptor".into()))),
        };

        // Checked on the raw map: the reported status decides before any field types do.
        if let Some(code) = fields.get("error").and_then(error_code) {
            return Err(UploadError::Upload {
                reason: format!("upload reported error code {}", code),
            });
        }
        let tmp_name = match fields.get("tmp_name").and_then(Value::as_str) {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(UploadError::Upload {
                    reason: "no temporary file was received".into(),
                })
            }
        };

        move_file(Path::new(tmp_name), destination)
            .map_err(|e| fail(TransferError::Io(e)))?;
        set_mode(destination, opts.upload_mode).map_err(|e| fail(TransferError::Io(e)))?;
        tracing::debug!(
            tmp = %tmp_name,
            path = %destination.display(),
            mode = %format!("{:o}", opts.upload_mode),
            "moved uploaded file"
        );
        Ok(())
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: serde_json::Value) -> Source {
        Source::from_arg(&value.to_string())
    }

    #[test]
    fn detects_descriptor_shape() {
        assert!(UploadAdapter.detect(&descriptor(json!({"tmp_name": "/tmp/a"}))));
        assert!(!UploadAdapter.detect(&descriptor(json!({"name": "a.txt"}))));
        assert!(!UploadAdapter.detect(&Source::from("/tmp/a")));
    }

    #[test]
    fn infers_name_and_extension() {
        let d = UploadAdapter.infer_destination(&descriptor(
            json!({"name": "photo.JPG", "tmp_name": "/tmp/x123", "error": 0}),
        ));
        assert_eq!(d.filename(), Some("photo"));
        assert_eq!(d.extension().as_deref(), Some("jpg"));
    }

    #[test]
    fn transfer_moves_and_sets_mode() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("php5Xa1");
        fs::write(&tmp, b"jpeg bytes").unwrap();
        let dst = dir.path().join("photo.jpg");
        let src = descriptor(json!({"name": "photo.JPG", "tmp_name": tmp, "error": 0}));
        UploadAdapter
            .transfer(&src, &dst, &TransferOptions::default())
            .unwrap();
        assert!(!tmp.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"jpeg bytes");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&dst).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn transfer_rejects_reported_error() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("partial");
        fs::write(&tmp, b"half").unwrap();
        let dst = dir.path().join("out.bin");
        let src = descriptor(json!({"name": "a.bin", "tmp_name": tmp, "error": 3}));
        let err = UploadAdapter
            .transfer(&src, &dst, &TransferOptions::default())
            .unwrap_err();
        assert!(matches!(err, UploadError::Upload { .. }));
        assert!(tmp.exists());
        assert!(!dst.exists());
    }

    #[test]
    fn transfer_rejects_empty_tmp_name() {
        let src = descriptor(json!({"name": "a.bin", "tmp_name": "", "error": 0}));
        let err = UploadAdapter
            .transfer(&src, Path::new("/tmp/never"), &TransferOptions::default())
            .unwrap_err();
        assert!(matches!(err, UploadError::Upload { .. }));
    }

    #[test]
    fn null_tmp_name_is_not_a_descriptor() {
        let src = descriptor(json!({"name": "a.txt", "tmp_name": null, "error": 4}));
        assert!(!UploadAdapter.detect(&src));
    }

    #[test]
    fn reported_error_wins_over_field_types() {
        let src = descriptor(json!({"name": "a.txt", "tmp_name": null, "error": 4, "size": "0"}));
        let err = UploadAdapter
            .transfer(&src, Path::new("/tmp/never"), &TransferOptions::default())
            .unwrap_err();
        match err {
            UploadError::Upload { reason } => assert!(reason.contains('4')),
            other => panic!("unexpected {:?}", other),
        }

        let untyped = descriptor(json!({"tmp_name": 17, "error": "0"}));
        let err = UploadAdapter
            .transfer(&untyped, Path::new("/tmp/never"), &TransferOptions::default())
            .unwrap_err();
        assert!(matches!(err, UploadError::Upload { .. }));
    }

    #[test]
    fn stringly_typed_size_still_transfers() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("phpQ9");
        fs::write(&tmp, b"ok").unwrap();
        let dst = dir.path().join("a.txt");
        let src = descriptor(json!({"name": "a.txt", "tmp_name": tmp, "error": "0", "size": "2"}));
        UploadAdapter
            .transfer(&src, &dst, &TransferOptions::default())
            .unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"ok");
    }

    #[test]
    fn transfer_missing_tmp_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = descriptor(json!({"tmp_name": dir.path().join("gone"), "error": 0}));
        let err = UploadAdapter
            .transfer(&src, &dir.path().join("out"), &TransferOptions::default())
            .unwrap_err();
        assert!(matches!(err, UploadError::Transfer { source: TransferError::Io(_), .. }));
    }
}
