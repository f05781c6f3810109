use crate::jobs::{Editor, NightlyConfig, Project, TestPlatform};
use crate::namer::DEFAULT_GRAPH_DIR;

/// The `gantry.toml` manifest describing the test matrix to generate jobs
/// for. Unknown top-level tables are rejected so typos surface as parse
/// errors instead of silently dropped configuration.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct GraphManifest {
    #[serde(default)]
    pub(super) graph: Option<ManifestGraphMeta>,
    #[serde(default)]
    pub(super) editors: Vec<Editor>,
    #[serde(default)]
    pub(super) test_platforms: Vec<TestPlatform>,
    #[serde(default)]
    pub(super) projects: Vec<Project>,
    #[serde(default)]
    pub(super) nightly: Option<NightlyConfig>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct ManifestGraphMeta {
    #[serde(default)]
    pub(super) output_dir: Option<String>,
}

impl GraphManifest {
    pub(super) fn output_dir(&self) -> &str {
        self.graph
            .as_ref()
            .and_then(|meta| meta.output_dir.as_deref())
            .unwrap_or(DEFAULT_GRAPH_DIR)
    }

    pub(super) fn editor(&self, version: &str) -> Option<&Editor> {
        self.editors.iter().find(|editor| editor.version == version)
    }
}
