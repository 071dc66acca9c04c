use crate::config::UploadConfig;
use crate::constants::{REMOTE_LOCATION_NOTE, TARGET_EXTENSION};
use crate::discovery::{discover, entry_kind, EntryKind};
use crate::error::{PipelineError, Result};
use crate::report::{run_isolated, BatchReport, ItemOutcome, Stage};
use crate::transport::{PutObjectRequest, Transport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Uploads every item with `transport`, one at a time.
///
/// Each object key comes from `key_for` applied to the file name. A failed
/// upload is logged and counted; the batch always runs to the end.
pub fn upload_all<K>(
    items: &[PathBuf],
    bucket: &str,
    transport: &dyn Transport,
    key_for: K,
) -> BatchReport
where
    K: Fn(&str) -> String,
{
    if items.is_empty() {
        info!("WebP files not found");
        return BatchReport::empty(Stage::Upload, REMOTE_LOCATION_NOTE);
    }

    run_isolated(Stage::Upload, items, REMOTE_LOCATION_NOTE, |path| {
        upload_one(path, bucket, transport, &key_for)
    })
}

fn upload_one<K>(
    path: &Path,
    bucket: &str,
    transport: &dyn Transport,
    key_for: &K,
) -> Result<ItemOutcome>
where
    K: Fn(&str) -> String,
{
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PipelineError::item(path, "file name is not valid UTF-8"))?;
    info!("Uploading: {}", name);

    let request = PutObjectRequest {
        bucket: bucket.to_string(),
        key: key_for(name),
        local_path: path.to_path_buf(),
        force_remote: true,
    };
    let size = fs::metadata(path)
        .map_err(|e| PipelineError::item(path, e))?
        .len();

    let outcome = transport
        .put_object(&request)
        .map_err(|e| e.for_item(path))?;
    if let Some(warning) = outcome.warning {
        warn!("Warning for {}: {}", name, warning);
    }
    info!("  R2 path: {}", request.key);

    Ok(ItemOutcome {
        bytes_in: size,
        bytes_out: size,
    })
}

/// Runs the whole upload stage for `config`.
///
/// Aborts before any upload when the conversion output folder is missing or
/// the transport cannot be started.
pub fn run_upload(config: &UploadConfig, transport: &dyn Transport) -> Result<BatchReport> {
    let output_dir = config.output_dir();
    if entry_kind(&output_dir) != EntryKind::Directory {
        return Err(PipelineError::Configuration(format!(
            "folder {} not found. Run the conversion first",
            output_dir.display()
        )));
    }

    let version = transport.probe()?;
    info!("✓ Wrangler CLI found {}", version);

    let candidates = discover(&output_dir, TARGET_EXTENSION)?;
    info!("Found {} WebP files for upload to R2", candidates.len());

    Ok(upload_all(&candidates, &config.bucket, transport, |name| {
        config.object_key(name)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::PutOutcome;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct FakeTransport {
        available: bool,
        fail_key: Option<String>,
        warning: Option<String>,
        calls: RefCell<Vec<PutObjectRequest>>,
    }

    impl FakeTransport {
        fn new() -> Self {
            Self {
                available: true,
                fail_key: None,
                warning: None,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeTransport {
        fn probe(&self) -> Result<String> {
            if self.available {
                Ok("3.0.0".to_string())
            } else {
                Err(PipelineError::ToolMissing {
                    tool: "Wrangler".to_string(),
                    hint: "install it".to_string(),
                })
            }
        }

        fn put_object(&self, request: &PutObjectRequest) -> Result<PutOutcome> {
            self.calls.borrow_mut().push(request.clone());
            if self.fail_key.as_deref() == Some(request.key.as_str()) {
                return Err(PipelineError::item(&request.local_path, "exit code 1"));
            }
            Ok(PutOutcome {
                warning: self.warning.clone(),
            })
        }
    }

    fn converted_folder(names: &[&str]) -> (TempDir, UploadConfig) {
        let temp_dir = TempDir::new().unwrap();
        let config = UploadConfig::new(temp_dir.path(), "assets");
        fs::create_dir(config.output_dir()).unwrap();
        for name in names {
            fs::write(config.output_dir().join(name), b"webp").unwrap();
        }
        (temp_dir, config)
    }

    #[test]
    fn test_run_upload_requires_output_folder() {
        let temp_dir = TempDir::new().unwrap();
        let config = UploadConfig::new(temp_dir.path(), "assets");
        let transport = FakeTransport::new();

        let result = run_upload(&config, &transport);

        assert!(matches!(result, Err(PipelineError::Configuration(_))));
        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn test_run_upload_tool_missing() {
        let (_temp_dir, config) = converted_folder(&["a.webp"]);
        let mut transport = FakeTransport::new();
        transport.available = false;

        let result = run_upload(&config, &transport);

        assert!(matches!(result, Err(PipelineError::ToolMissing { .. })));
        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn test_run_upload_empty_folder() {
        let (_temp_dir, config) = converted_folder(&["notes.txt"]);
        let transport = FakeTransport::new();

        let report = run_upload(&config, &transport).unwrap();

        assert_eq!(report.total, 0);
        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn test_run_upload_isolates_failures() {
        let (_temp_dir, config) = converted_folder(&["a.webp", "b.webp", "c.WEBP"]);
        let mut transport = FakeTransport::new();
        transport.fail_key = Some("b.webp".to_string());

        let report = run_upload(&config, &transport).unwrap();

        assert_eq!(transport.calls.borrow().len(), 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(report.is_consistent());
        for call in transport.calls.borrow().iter() {
            assert_eq!(call.bucket, "assets");
            assert!(call.force_remote);
            assert_eq!(call.local_path.parent().unwrap(), config.output_dir());
        }
    }

    #[test]
    fn test_warning_counts_as_success() {
        let (_temp_dir, config) = converted_folder(&["a.webp"]);
        let mut transport = FakeTransport::new();
        transport.warning = Some("update available".to_string());

        let report = run_upload(&config, &transport).unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.bytes_out, 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_fails_without_upload() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_temp_dir, config) = converted_folder(&["a.webp"]);
        let odd = config.output_dir().join(OsStr::from_bytes(b"b\xff.webp"));
        fs::write(&odd, b"webp").unwrap();
        let items = vec![config.output_dir().join("a.webp"), odd.clone()];
        let transport = FakeTransport::new();

        let report = upload_all(&items, "assets", &transport, |name| name.to_string());

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failed_items().collect::<Vec<_>>(), vec![odd.as_path()]);
        let calls = transport.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].key, "a.webp");
    }

    #[test]
    fn test_upload_all_uses_key_prefix() {
        let (_temp_dir, mut config) = converted_folder(&["a.webp"]);
        config.key_prefix = "webp-images".to_string();
        let transport = FakeTransport::new();

        run_upload(&config, &transport).unwrap();

        assert_eq!(transport.calls.borrow()[0].key, "webp-images/a.webp");
    }
}
