//! Error types shared across QRMark crates.

use std::fmt;
use std::path::PathBuf;

/// Which of the two submitted images an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    /// The picture the QR code is stamped onto.
    Host,
    /// The QR code itself.
    Qr,
}

impl ImageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Qr => "qr",
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for QRMark operations.
#[derive(Debug, thiserror::Error)]
pub enum QrmarkError {
    #[error("Failed to load {role} image from {}: {message}", .path.display())]
    Load {
        role: ImageRole,
        path: PathBuf,
        message: String,
    },

    #[error("Host image {width}x{height} is too small to place a QR overlay")]
    DegenerateSize { width: u32, height: u32 },

    #[error(
        "QR overlay of {size}px with a {margin}px margin does not fit in a {width}x{height} host image"
    )]
    OutOfBoundsPlacement {
        size: u32,
        margin: u32,
        width: u32,
        height: u32,
    },

    #[error("Please upload both the host image and QR image (missing: {})", join_roles(.missing))]
    MissingInput { missing: Vec<ImageRole> },

    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using QrmarkError.
pub type QrmarkResult<T> = Result<T, QrmarkError>;

impl QrmarkError {
    pub fn load(role: ImageRole, path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Load {
            role,
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the caller, not the server, is at fault.
    ///
    /// Only a missing upload qualifies; every compositing failure is reported
    /// as a server error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingInput { .. })
    }
}

fn join_roles(roles: &[ImageRole]) -> String {
    roles
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
