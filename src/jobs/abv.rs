use crate::namer::JobNamer;
use crate::yml::{DependencyRef, JobDefinition};

use super::{Editor, JobError, NightlyAddition, NightlyConfig, Project, TestPlatform};

pub(crate) const NIGHTLY_TRIGGER_BRANCH: &str = "master";
pub(crate) const NIGHTLY_TRIGGER_CRON: &str = "0 * * ?";

/// Assembles the nightly all-project job definition: the aggregate CI job
/// first, then one smoke-test dependency per test platform, then one
/// project-test dependency per (addition, test platform) pair, all with
/// rerun forced.
///
/// `_projects` is accepted for call-shape compatibility with the other job
/// assemblers and carries no behavior here.
pub fn nightly_job_definition(
    namer: &dyn JobNamer,
    editor: &Editor,
    _projects: &[Project],
    test_platforms: &[TestPlatform],
    nightly_additions: &[NightlyAddition],
) -> JobDefinition {
    let mut dependencies = vec![DependencyRef::always(namer.dependency_path(
        &namer.abv_filepath(),
        &namer.abv_job_id_all_project_ci(&editor.version),
    ))];

    // TODO: collapse these into the aggregate smoke-test job once the rerun
    // policy can override the nested jobs' own policies.
    for test_platform in test_platforms {
        dependencies.push(DependencyRef::always(namer.dependency_path(
            &namer.abv_filepath(),
            &namer.abv_job_id_smoke_test(&editor.version, &test_platform.name),
        )));
    }

    for addition in nightly_additions {
        for tp_name in &addition.test_platform_names {
            dependencies.push(DependencyRef::always(namer.dependency_path(
                &namer.project_filepath_specific(
                    &addition.project_name,
                    &addition.platform_name,
                    &addition.api_name,
                ),
                &namer.project_job_id_test(
                    &addition.project_name,
                    &addition.platform_name,
                    &addition.api_name,
                    tp_name,
                    &editor.version,
                ),
            )));
        }
    }

    let mut job = JobDefinition::new();
    job.set_name(format!("_Nightly ABV against {}", editor.version));
    job.add_dependencies(dependencies);
    job.add_var_custom_revision(&editor.version);
    job.set_trigger_recurrent(NIGHTLY_TRIGGER_BRANCH, NIGHTLY_TRIGGER_CRON);
    job
}

/// Nightly all-project job record: a stable job id plus the serialized job
/// definition. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct AbvNightlyJob {
    pub job_id: String,
    pub yml: serde_yaml::Value,
}

impl AbvNightlyJob {
    pub fn new(
        namer: &dyn JobNamer,
        editor: &Editor,
        projects: &[Project],
        test_platforms: &[TestPlatform],
        nightly_config: &NightlyConfig,
    ) -> Result<Self, JobError> {
        if !nightly_config
            .allowed_editors
            .iter()
            .any(|allowed| allowed == &editor.version)
        {
            return Err(JobError::NightlyVersionNotAllowed {
                version: editor.version.clone(),
            });
        }

        let job_id = namer.abv_job_id_all_project_ci_nightly(&editor.version);
        let definition = nightly_job_definition(
            namer,
            editor,
            projects,
            test_platforms,
            &nightly_config.additional_jobs,
        );
        let yml = definition.to_yaml_value()?;
        Ok(Self { job_id, yml })
    }
}

#[cfg(test)]
#[path = "../tests/abv_tests.rs"]
mod tests;
