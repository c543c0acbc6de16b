//! One client invocation against a connected printer
//!
//! Runs the requested queries, the optional upload and print, then always
//! releases the board, whatever happened before.

use crate::communication::Transport;
use crate::transfer::listener::TransferListener;
use crate::transfer::report::{PrintOutcome, UploadReport};
use crate::transfer::session::Session;
use serde::Serialize;
use std::path::PathBuf;
use wifiprint_core::{ControllerError, Error, Result};

/// What the user asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
    /// Query machine status
    pub status: bool,
    /// Query SD file list
    pub list_files: bool,
    /// File to upload
    pub upload: Option<PathBuf>,
    /// Start printing the uploaded file
    pub print_after_upload: bool,
}

/// Everything a job produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobReport {
    /// Raw status response
    pub status: Option<String>,
    /// Raw file list response
    pub file_list: Option<String>,
    /// Upload outcome
    pub upload: Option<UploadReport>,
    /// Print outcome
    pub print: Option<PrintOutcome>,
    /// Whether the release command got a response
    pub released: bool,
}

/// Report plus the error that stopped the job, if any
#[derive(Debug)]
pub struct JobOutcome {
    /// Collected results
    pub report: JobReport,
    /// First error that aborted the job
    pub error: Option<Error>,
}

impl JobOutcome {
    /// Whether the invocation should exit with status zero
    ///
    /// Rejected chunks and refused print commands are reported, not failures.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Run `job` and release the session
pub async fn run_job<T: Transport>(
    mut session: Session<T>,
    job: &Job,
    listener: &dyn TransferListener,
) -> JobOutcome {
    let mut report = JobReport::default();
    let error = execute(&mut session, job, listener, &mut report).await.err();

    if let Some(e) = &error {
        tracing::error!("{}", e);
    }

    match session.release().await {
        Ok(_) => report.released = true,
        Err(e) => tracing::warn!("Release failed: {}", e),
    }

    JobOutcome { report, error }
}

async fn execute<T: Transport>(
    session: &mut Session<T>,
    job: &Job,
    listener: &dyn TransferListener,
    report: &mut JobReport,
) -> Result<()> {
    if job.status {
        report.status = Some(session.status().await?);
    }

    if job.list_files {
        report.file_list = Some(session.list_files().await?);
    }

    let Some(path) = &job.upload else {
        return Ok(());
    };

    let upload = session.upload_file(path, listener).await?;
    let file_name = file_name_of(path)?;
    let complete = upload.is_complete();
    report.upload = Some(upload);

    if job.print_after_upload {
        if !complete {
            tracing::warn!("Upload incomplete, starting print of partial {}", file_name);
        }
        report.print = Some(session.start_print(&file_name).await?);
    }

    Ok(())
}

fn file_name_of(path: &std::path::Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ControllerError::InvalidSource {
                reason: format!("{} has no file name", path.display()),
            }
            .into()
        })
}
