//! The two uploads that make up one request.

use qrmark_common::error::{ImageRole, QrmarkError, QrmarkResult};

/// One uploaded file.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Client-side file name, if the transport carried one.
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: Option<String>, bytes: Vec<u8>) -> Self {
        Self { filename, bytes }
    }

    /// An empty file field counts as no upload at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A host image and a QR image, either of which may be absent.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub host: Option<Upload>,
    pub qr: Option<Upload>,
}

impl Submission {
    pub fn new(host: Option<Upload>, qr: Option<Upload>) -> Self {
        Self { host, qr }
    }

    /// Split into both uploads, or report every missing one.
    pub fn into_parts(self) -> QrmarkResult<(Upload, Upload)> {
        let host = self.host.filter(|u| !u.is_empty());
        let qr = self.qr.filter(|u| !u.is_empty());

        match (host, qr) {
            (Some(host), Some(qr)) => Ok((host, qr)),
            (host, qr) => {
                let mut missing = Vec::new();
                if host.is_none() {
                    missing.push(ImageRole::Host);
                }
                if qr.is_none() {
                    missing.push(ImageRole::Qr);
                }
                Err(QrmarkError::MissingInput { missing })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(bytes: &[u8]) -> Upload {
        Upload::new(Some("file.png".to_string()), bytes.to_vec())
    }

    #[test]
    fn complete_submission_splits() {
        let (host, qr) = Submission::new(Some(upload(b"h")), Some(upload(b"q")))
            .into_parts()
            .unwrap();
        assert_eq!(host.bytes, b"h");
        assert_eq!(qr.bytes, b"q");
    }

    #[test]
    fn empty_upload_counts_as_missing() {
        let err = Submission::new(Some(upload(b"h")), Some(upload(b"")))
            .into_parts()
            .unwrap_err();
        assert!(matches!(
            err,
            QrmarkError::MissingInput { ref missing } if missing == &[ImageRole::Qr]
        ));
    }

    #[test]
    fn both_missing_are_reported() {
        let err = Submission::default().into_parts().unwrap_err();
        assert!(matches!(
            err,
            QrmarkError::MissingInput { ref missing }
                if missing == &[ImageRole::Host, ImageRole::Qr]
        ));
    }
}
