use indexmap::IndexMap;

/// Re-run policy attached to a dependency reference. `Always` forces the
/// referenced job to be re-evaluated regardless of upstream cache or skip
/// logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RerunPolicy {
    Always,
    OnNewRevision,
}

/// Pointer to another job in the graph plus its re-run policy.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DependencyRef {
    pub path: String,
    pub rerun: RerunPolicy,
}

impl DependencyRef {
    pub fn always(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            rerun: RerunPolicy::Always,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Recurrent,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub kind: TriggerKind,
    pub branch: String,
    pub cron: String,
}

/// Accumulator for one declarative job record. Built through the mutators
/// below and serialized once construction is complete; empty collections and
/// an absent trigger are omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct JobDefinition {
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<DependencyRef>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    variables: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trigger: Option<Trigger>,
}

impl JobDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_dependency(&mut self, dependency: DependencyRef) {
        self.dependencies.push(dependency);
    }

    pub fn add_dependencies(&mut self, dependencies: Vec<DependencyRef>) {
        self.dependencies.extend(dependencies);
    }

    pub fn dependencies(&self) -> &[DependencyRef] {
        &self.dependencies
    }

    pub fn add_var_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Binds the editor revision parameter consumed by downstream jobs.
    pub fn add_var_custom_revision(&mut self, version: &str) {
        self.add_var_custom("revision", version);
    }

    pub fn variables(&self) -> &IndexMap<String, String> {
        &self.variables
    }

    pub fn set_trigger_recurrent(&mut self, branch: impl Into<String>, cron: impl Into<String>) {
        self.trigger = Some(Trigger {
            kind: TriggerKind::Recurrent,
            branch: branch.into(),
            cron: cron.into(),
        });
    }

    pub fn trigger(&self) -> Option<&Trigger> {
        self.trigger.as_ref()
    }

    pub fn to_yaml_value(&self) -> Result<serde_yaml::Value, serde_yaml::Error> {
        serde_yaml::to_value(self)
    }
}

#[cfg(test)]
#[path = "tests/yml_tests.rs"]
mod tests;
