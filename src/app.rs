//! One client invocation: connect, run the job, report

use crate::cli::{Cli, OutputFormat};
use crate::progress::UploadProgress;
use crate::{connection_params, session_options};
use std::process::ExitCode;
use wifiprint_communication::{
    run_job, JobOutcome, NoOpListener, PrintOutcome, Session, TransferListener, UploadStatus,
};
use wifiprint_settings::Config;

/// Connect, run the requested job and map the outcome to an exit code
///
/// A failed connect or INIT handshake exits without sending release; every
/// later failure still releases the board first.
pub async fn run(cli: &Cli, config: &Config) -> anyhow::Result<ExitCode> {
    let params = connection_params(config);
    let session = match Session::connect(&params, session_options(config)).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed TCP connection to {}: {}", params.host, e);
            eprintln!("Error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::info!("{}", session);

    let job = cli.job();
    if let (Some(path), OutputFormat::Text) = (&job.upload, cli.format) {
        println!("Sending to printer: {}", path.display());
    }

    let progress = UploadProgress::default();
    let listener: &dyn TransferListener =
        if cli.format == OutputFormat::Text && !cli.no_progress {
            &progress
        } else {
            &NoOpListener
        };

    let outcome = run_job(session, &job, listener).await;
    drop(progress);

    match cli.format {
        OutputFormat::Text => print_text(&outcome),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.report)?),
    }

    if let Some(e) = &outcome.error {
        eprintln!("Error: {}", e);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_text(outcome: &JobOutcome) {
    let report = &outcome.report;

    if let Some(status) = &report.status {
        println!("{}", status);
    }

    if let Some(files) = &report.file_list {
        println!("{}", files);
    }

    if let Some(upload) = &report.upload {
        match upload.status {
            UploadStatus::Completed => println!(
                "Sent {} bytes to {} in {} chunks",
                upload.bytes_sent, upload.remote_path, upload.chunks_sent
            ),
            UploadStatus::ChunkRejected { sequence } => println!(
                "Upload of {} stopped at chunk {}: {} of {} bytes accepted ({:.0}%)",
                upload.remote_path,
                sequence,
                upload.bytes_sent,
                upload.total_bytes,
                upload.percent_sent()
            ),
        }
    }

    match &report.print {
        Some(PrintOutcome::Started { path }) => println!("Set to print: {}", path),
        Some(PrintOutcome::FileSelectRejected { path, .. }) => {
            println!("Printer refused to select {}", path)
        }
        Some(PrintOutcome::StartRejected { path, .. }) => {
            println!("Printer refused to start printing {}", path)
        }
        None => {}
    }
}
