//! Stage uploads, run the compositor, and map the outcome to a response.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use qrmark_common::config::CompositeOptions;
use qrmark_common::error::QrmarkResult;
use qrmark_compositor::CompositeJob;

use crate::response::SubmissionResponse;
use crate::submission::{Submission, Upload};

const HOST_FILE: &str = "host_image.png";
const QR_FILE: &str = "qr_image.png";
const OUTPUT_FILE: &str = "combined_image.png";

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifies one submission and names its staging directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// UTC timestamp, process id and a process-wide sequence number.
    pub fn generate() -> Self {
        let seq = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!(
            "{}-{}-{:06}",
            chrono::Utc::now().format("%Y%m%dT%H%M%S%.6fZ"),
            std::process::id(),
            seq
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handles submissions against one staging root.
///
/// Each request gets its own directory under the root, so concurrent
/// requests never share input or output files.
#[derive(Debug, Clone)]
pub struct SubmissionHandler {
    staging_root: PathBuf,
    options: CompositeOptions,
    keep_staging: bool,
}

impl SubmissionHandler {
    pub fn new(staging_root: impl Into<PathBuf>, options: CompositeOptions) -> Self {
        Self {
            staging_root: staging_root.into(),
            options,
            keep_staging: false,
        }
    }

    /// Leave each request's staged files on disk after responding.
    pub fn keep_staging(mut self, keep: bool) -> Self {
        self.keep_staging = keep;
        self
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Process a submission. Never fails; errors become text responses.
    pub fn handle(&self, submission: Submission) -> SubmissionResponse {
        match self.process(submission) {
            Ok(png) => SubmissionResponse::png(png),
            Err(err) if err.is_client_error() => {
                tracing::warn!(error = %err, "Rejected submission");
                SubmissionResponse::client_error(err.to_string())
            }
            Err(err) => {
                tracing::error!(error = %err, "An error occurred while compositing");
                SubmissionResponse::server_error(err.to_string())
            }
        }
    }

    fn process(&self, submission: Submission) -> QrmarkResult<Vec<u8>> {
        let (host, qr) = submission.into_parts()?;

        let request_id = RequestId::generate();
        let dir = self.staging_root.join(request_id.as_str());
        std::fs::create_dir_all(&self.staging_root)?;
        std::fs::create_dir(&dir)?;
        tracing::debug!(
            request = %request_id,
            host_name = host.filename.as_deref().unwrap_or("-"),
            host_bytes = host.bytes.len(),
            qr_name = qr.filename.as_deref().unwrap_or("-"),
            qr_bytes = qr.bytes.len(),
            "Staging submission"
        );

        let result = self.composite_staged(&dir, &host, &qr);

        if self.keep_staging {
            tracing::debug!(dir = %dir.display(), "Keeping staged files");
        } else if let Err(err) = std::fs::remove_dir_all(&dir) {
            tracing::warn!(
                error = %err,
                dir = %dir.display(),
                "Failed to remove staging directory"
            );
        }

        result
    }

    fn composite_staged(&self, dir: &Path, host: &Upload, qr: &Upload) -> QrmarkResult<Vec<u8>> {
        let host_path = dir.join(HOST_FILE);
        let qr_path = dir.join(QR_FILE);
        std::fs::write(&host_path, &host.bytes)?;
        std::fs::write(&qr_path, &qr.bytes)?;

        let output_path = dir.join(OUTPUT_FILE);
        let outcome = CompositeJob::new(host_path, qr_path, output_path, self.options).run()?;
        Ok(std::fs::read(outcome.output_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{ResponseStatus, PNG_CONTENT_TYPE, TEXT_CONTENT_TYPE};
    use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn staging_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "qrmark-upload-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn png_upload(write: impl FnOnce(&mut Cursor<&mut Vec<u8>>)) -> Upload {
        let mut bytes = Vec::new();
        write(&mut Cursor::new(&mut bytes));
        Upload::new(Some("upload.png".to_string()), bytes)
    }

    fn host_upload(width: u32, height: u32) -> Upload {
        png_upload(|w| {
            RgbImage::from_pixel(width, height, Rgb([60, 120, 180]))
                .write_to(w, ImageFormat::Png)
                .unwrap()
        })
    }

    fn qr_upload() -> Upload {
        png_upload(|w| {
            GrayImage::from_pixel(21, 21, Luma([255]))
                .write_to(w, ImageFormat::Png)
                .unwrap()
        })
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn missing_qr_is_a_client_error_and_writes_nothing() {
        let root = staging_root("missing");
        let handler = SubmissionHandler::new(&root, CompositeOptions::default());

        let response = handler.handle(Submission::new(Some(host_upload(40, 40)), None));

        assert_eq!(response.status, ResponseStatus::ClientError);
        assert_eq!(response.status.code(), 400);
        assert_eq!(response.content_type, TEXT_CONTENT_TYPE);
        assert!(response
            .text_body()
            .unwrap()
            .starts_with("Please upload both the host image and QR image"));
        assert!(!root.exists());
    }

    #[test]
    fn successful_submission_returns_png_and_cleans_up() {
        let root = staging_root("ok");
        let handler = SubmissionHandler::new(&root, CompositeOptions::default());

        let submission = Submission::new(Some(host_upload(200, 120)), Some(qr_upload()));
        let response = handler.handle(submission);

        assert!(response.is_success());
        assert_eq!(response.content_type, PNG_CONTENT_TYPE);
        let out = image::load_from_memory(&response.body).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (200, 120));
        // S = 30, placement (160, 80); white QR at 50% over the host color.
        assert_eq!(out.get_pixel(170, 90), &Rgb([158, 188, 218]));
        assert_eq!(out.get_pixel(5, 5), &Rgb([60, 120, 180]));
        assert_eq!(entries(&root), 0);

        std::fs::remove_dir_all(root).ok();
    }

    #[test]
    fn corrupt_host_is_a_server_error() {
        let root = staging_root("corrupt");
        let handler = SubmissionHandler::new(&root, CompositeOptions::default());
        let corrupt = Upload::new(None, b"not an image".to_vec());

        let response = handler.handle(Submission::new(Some(corrupt), Some(qr_upload())));

        assert_eq!(response.status.code(), 500);
        let message = response.text_body().unwrap();
        assert!(message.starts_with("Failed to load host image"), "{message}");
        assert_eq!(entries(&root), 0);

        std::fs::remove_dir_all(root).ok();
    }

    #[test]
    fn kept_staging_holds_inputs_and_output() {
        let root = staging_root("keep");
        let handler =
            SubmissionHandler::new(&root, CompositeOptions::default()).keep_staging(true);

        let submission = Submission::new(Some(host_upload(80, 80)), Some(qr_upload()));
        let response = handler.handle(submission);
        assert!(response.is_success());

        let request_dir = std::fs::read_dir(&root)
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        for name in [HOST_FILE, QR_FILE, OUTPUT_FILE] {
            assert!(request_dir.join(name).exists(), "{name} should be kept");
        }
        assert_eq!(std::fs::read(request_dir.join(OUTPUT_FILE)).unwrap(), response.body);

        std::fs::remove_dir_all(root).ok();
    }

    #[test]
    fn request_ids_are_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
    }
}
