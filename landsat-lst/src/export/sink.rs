//! Export submission backends.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;

use super::{ExportError, ExportJob};

/// Opaque identifier of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepts export jobs.
///
/// Submission is fire-and-forget: the returned handle identifies the job
/// but nothing waits on it.
pub trait ExportSink: Send + Sync {
    fn submit(&self, job: ExportJob) -> Result<JobHandle, ExportError>;
}

/// Writes each job as `{description}.json` into a directory.
///
/// An existing job file is never replaced; submitting a second job with the
/// same description fails with [`ExportError::AlreadyExists`].
///
/// The file holds the job parameters and the serialized expression graph
/// of the raster, so any backend able to evaluate the graph can pick the
/// job up later.
#[derive(Debug, Clone)]
pub struct ManifestSink {
    output_dir: PathBuf,
}

impl ManifestSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a job with `description` is written to.
    pub fn job_path(&self, description: &str) -> PathBuf {
        self.output_dir.join(format!("{description}.json"))
    }
}

impl ExportSink for ManifestSink {
    fn submit(&self, job: ExportJob) -> Result<JobHandle, ExportError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.job_path(&job.description);
        let json = serde_json::to_vec_pretty(&job)?;
        let io_error = |source: std::io::Error| match source.kind() {
            ErrorKind::AlreadyExists => ExportError::AlreadyExists(path.clone()),
            _ => ExportError::Io {
                path: path.clone(),
                source,
            },
        };
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(io_error)?;
        file.write_all(&json).map_err(io_error)?;

        Ok(JobHandle::new(path.display().to_string()))
    }
}

/// Keeps submitted jobs in memory.
///
/// Submissions whose description was registered with
/// [`RecordingSink::reject`] fail with [`ExportError::Rejected`].
#[derive(Debug, Default)]
pub struct RecordingSink {
    jobs: Mutex<Vec<ExportJob>>,
    rejected: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(self, description: impl Into<String>) -> Self {
        self.rejected.lock().push(description.into());
        self
    }

    /// Jobs accepted so far, in submission order.
    pub fn jobs(&self) -> Vec<ExportJob> {
        self.jobs.lock().clone()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.jobs
            .lock()
            .iter()
            .map(|job| job.description.clone())
            .collect()
    }
}

impl ExportSink for RecordingSink {
    fn submit(&self, job: ExportJob) -> Result<JobHandle, ExportError> {
        if self.rejected.lock().contains(&job.description) {
            return Err(ExportError::Rejected(job.description));
        }
        let mut jobs = self.jobs.lock();
        jobs.push(job);
        Ok(JobHandle::new(format!("job-{}", jobs.len())))
    }
}
