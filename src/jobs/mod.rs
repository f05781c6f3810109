pub mod abv;

/// One editor line under test, e.g. `trunk` or `2020.1`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Editor {
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestPlatform {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
}

/// Extra project/platform/graphics-API triple folded into the nightly
/// dependency set, crossed with each named test platform.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NightlyAddition {
    pub project_name: String,
    pub platform_name: String,
    pub api_name: String,
    #[serde(default)]
    pub test_platform_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NightlyConfig {
    /// Editor versions to build nightly jobs for.
    #[serde(default)]
    pub editors: Vec<String>,
    /// Editor versions permitted to have a nightly job constructed.
    pub allowed_editors: Vec<String>,
    #[serde(default)]
    pub additional_jobs: Vec<NightlyAddition>,
}

#[derive(Debug)]
pub enum JobError {
    NightlyVersionNotAllowed { version: String },
    Serialize(serde_yaml::Error),
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobError::NightlyVersionNotAllowed { version } => write!(
                f,
                "tried to construct nightly with PR trigger for version {version}"
            ),
            JobError::Serialize(error) => {
                write!(f, "failed to serialize job definition: {error}")
            }
        }
    }
}

impl std::error::Error for JobError {}

impl From<serde_yaml::Error> for JobError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Serialize(value)
    }
}
