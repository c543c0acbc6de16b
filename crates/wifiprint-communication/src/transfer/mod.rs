//! File transfer engine
//!
//! Session state machine, upload sources, progress listeners and the
//! per-invocation job runner.

pub mod job;
pub mod listener;
pub mod report;
pub mod session;
pub mod source;

pub use job::{run_job, Job, JobOutcome, JobReport};
pub use listener::{NoOpListener, TransferListener};
pub use report::{PrintOutcome, UploadReport, UploadStatus};
pub use session::{Session, SessionOptions};
pub use source::UploadSource;
