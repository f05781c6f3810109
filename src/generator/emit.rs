use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_yaml::Mapping;

use super::model::{EmittedFile, PlannedJob};
use super::GeneratorError;

/// Renders one YAML document per distinct target file (job id → definition,
/// plan order preserved) and writes it under `root` unless `dry_run` is set.
pub(super) fn emit_job_files(
    root: &Path,
    planned: &[PlannedJob],
    dry_run: bool,
) -> Result<Vec<EmittedFile>, GeneratorError> {
    let mut grouped: IndexMap<&str, Vec<&PlannedJob>> = IndexMap::new();
    for job in planned {
        grouped.entry(job.filepath.as_str()).or_default().push(job);
    }

    let mut emitted = Vec::new();
    for (filepath, jobs) in &grouped {
        let mut document = Mapping::new();
        for job in jobs {
            document.insert(
                serde_yaml::Value::String(job.job_id.clone()),
                job.yml.clone(),
            );
        }
        let rendered =
            serde_yaml::to_string(&document).map_err(|error| GeneratorError::RenderJobFile {
                filepath: (*filepath).to_owned(),
                error,
            })?;

        if !dry_run {
            let target = root.join(filepath);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|error| GeneratorError::CreateOutputDir {
                    path: parent.to_path_buf(),
                    error,
                })?;
            }
            fs::write(&target, &rendered).map_err(|error| GeneratorError::WriteJobFile {
                path: target.clone(),
                error,
            })?;
        }

        emitted.push(EmittedFile {
            filepath: (*filepath).to_owned(),
            job_ids: jobs.iter().map(|job| job.job_id.clone()).collect(),
            bytes: rendered.len(),
        });
    }

    Ok(emitted)
}
