use std::path::PathBuf;

use super::manifest::GraphManifest;

pub(super) const MANIFEST_FILE: &str = "gantry.toml";

#[derive(Debug)]
pub(super) struct LoadedManifest {
    pub(super) manifest_path: PathBuf,
    pub(super) manifest: GraphManifest,
}

/// One job scheduled for emission. Jobs sharing a filepath are written into
/// the same document, keyed by job id, in plan order.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PlannedJob {
    pub(super) job_id: String,
    pub(super) filepath: String,
    pub(super) dependency_count: usize,
    pub(super) yml: serde_yaml::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct EmittedFile {
    pub(super) filepath: String,
    pub(super) job_ids: Vec<String>,
    pub(super) bytes: usize,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct JsonJob {
    pub(super) job_id: String,
    pub(super) file: String,
    pub(super) dependencies: usize,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct JsonFile {
    pub(super) file: String,
    pub(super) jobs: Vec<String>,
    pub(super) bytes: usize,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct JsonGenerateReport {
    pub(super) root: String,
    pub(super) manifest: String,
    pub(super) dry_run: bool,
    pub(super) jobs: Vec<JsonJob>,
    pub(super) files: Vec<JsonFile>,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct JsonJobsReport {
    pub(super) root: String,
    pub(super) manifest: String,
    pub(super) jobs: Vec<JsonJob>,
}
