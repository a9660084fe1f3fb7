//! Run two files through the upload handler.

use std::path::{Path, PathBuf};

use qrmark_common::config::CompositeOptions;
use qrmark_upload::{Submission, SubmissionHandler, Upload};

pub fn run(
    host: Option<PathBuf>,
    qr: Option<PathBuf>,
    output: PathBuf,
    staging: PathBuf,
    keep_staging: bool,
    options: CompositeOptions,
) -> anyhow::Result<()> {
    let submission = Submission::new(read_upload(host.as_deref())?, read_upload(qr.as_deref())?);
    let handler = SubmissionHandler::new(staging, options).keep_staging(keep_staging);
    tracing::debug!(staging = %handler.staging_root().display(), "Submitting");

    let response = handler.handle(submission);
    println!(
        "Status: {} ({})",
        response.status.code(),
        response.content_type
    );

    if !response.is_success() {
        let message = response.text_body().unwrap_or("<binary body>");
        return Err(anyhow::anyhow!("{message}"));
    }

    std::fs::write(&output, &response.body)?;
    println!("Wrote {} ({} bytes)", output.display(), response.body.len());
    Ok(())
}

fn read_upload(path: Option<&Path>) -> anyhow::Result<Option<Upload>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read upload {}: {e}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(Some(Upload::new(filename, bytes)))
}
