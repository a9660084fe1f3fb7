//! QRMark Upload Boundary
//!
//! Transport-agnostic handling of a two-image submission. An HTTP layer
//! maps its multipart form onto a [`Submission`], calls
//! [`SubmissionHandler::handle`], and copies the [`SubmissionResponse`]
//! status, content type and body onto the wire.

pub mod handler;
pub mod response;
pub mod submission;

pub use handler::{RequestId, SubmissionHandler};
pub use response::{ResponseStatus, SubmissionResponse};
pub use submission::{Submission, Upload};
