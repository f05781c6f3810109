pub const DEFAULT_GRAPH_DIR: &str = ".graph";

/// Naming conventions for identifiers and file paths across the emitted job
/// graph. A dependency reference joins a graph-relative file path and a job
/// id with `#`, e.g. `.graph/_abv.yml#all_project_ci_trunk`.
pub trait JobNamer {
    fn abv_filepath(&self) -> String;
    fn abv_job_id_all_project_ci(&self, version: &str) -> String;
    fn abv_job_id_all_project_ci_nightly(&self, version: &str) -> String;
    fn abv_job_id_smoke_test(&self, version: &str, test_platform: &str) -> String;
    fn project_filepath_specific(&self, project: &str, platform: &str, api: &str) -> String;
    fn project_job_id_test(
        &self,
        project: &str,
        platform: &str,
        api: &str,
        test_platform: &str,
        version: &str,
    ) -> String;

    fn dependency_path(&self, filepath: &str, job_id: &str) -> String {
        format!("{filepath}#{job_id}")
    }
}

/// The canonical convention: job ids keep the casing of their inputs, file
/// names are lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionNamer {
    graph_dir: String,
}

impl ConventionNamer {
    pub fn new() -> Self {
        Self::with_graph_dir(DEFAULT_GRAPH_DIR)
    }

    pub fn with_graph_dir(graph_dir: impl Into<String>) -> Self {
        Self {
            graph_dir: graph_dir.into(),
        }
    }
}

impl Default for ConventionNamer {
    fn default() -> Self {
        Self::new()
    }
}

impl JobNamer for ConventionNamer {
    fn abv_filepath(&self) -> String {
        format!("{}/_abv.yml", self.graph_dir)
    }

    fn abv_job_id_all_project_ci(&self, version: &str) -> String {
        format!("all_project_ci_{version}")
    }

    fn abv_job_id_all_project_ci_nightly(&self, version: &str) -> String {
        format!("all_project_ci_nightly_{version}")
    }

    fn abv_job_id_smoke_test(&self, version: &str, test_platform: &str) -> String {
        format!("smoke_test_{test_platform}_{version}")
    }

    fn project_filepath_specific(&self, project: &str, platform: &str, api: &str) -> String {
        format!(
            "{}/{}-{}-{}.yml",
            self.graph_dir,
            project.to_lowercase(),
            platform.to_lowercase(),
            api.to_lowercase()
        )
    }

    fn project_job_id_test(
        &self,
        project: &str,
        platform: &str,
        api: &str,
        test_platform: &str,
        version: &str,
    ) -> String {
        format!("{project}_{platform}_{api}_{test_platform}_{version}")
    }
}

#[cfg(test)]
#[path = "tests/namer_tests.rs"]
mod tests;
