use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::jobs::abv::AbvNightlyJob;
use crate::jobs::JobError;
use crate::namer::{ConventionNamer, JobNamer};
use crate::resolver::{resolve_target_root, ResolveError};
use crate::ui::{
    resolve_color_enabled, KeyValue, NoticeLevel, OutputMode, PlainRenderer, Renderer, StepState,
    SummaryCounts, TableSpec,
};
use crate::{Command, GenerateArgs, JobsArgs};

mod emit;
mod manifest;
mod model;

use emit::emit_job_files;
use model::{
    JsonFile, JsonGenerateReport, JsonJob, JsonJobsReport, LoadedManifest, PlannedJob,
    MANIFEST_FILE,
};

#[derive(Debug)]
pub enum GeneratorError {
    Cwd(std::io::Error),
    Resolve(ResolveError),
    Job(JobError),
    Ui(String),
    ManifestMissing {
        root: PathBuf,
    },
    ManifestRead {
        path: PathBuf,
        error: std::io::Error,
    },
    ManifestParse {
        path: PathBuf,
        error: toml::de::Error,
    },
    UnknownNightlyEditor {
        version: String,
        manifest_path: PathBuf,
    },
    InvalidJobFilter {
        pattern: String,
        error: globset::Error,
    },
    RenderJobFile {
        filepath: String,
        error: serde_yaml::Error,
    },
    CreateOutputDir {
        path: PathBuf,
        error: std::io::Error,
    },
    WriteJobFile {
        path: PathBuf,
        error: std::io::Error,
    },
    Json(serde_json::Error),
}

impl std::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorError::Cwd(error) => {
                write!(f, "failed to resolve current directory: {error}")
            }
            GeneratorError::Resolve(error) => write!(f, "{error}"),
            GeneratorError::Job(error) => write!(f, "{error}"),
            GeneratorError::Ui(msg) => write!(f, "ui render failed: {msg}"),
            GeneratorError::ManifestMissing { root } => write!(
                f,
                "no {MANIFEST_FILE} found under {} (expected the generation manifest at the target root)",
                root.display()
            ),
            GeneratorError::ManifestRead { path, error } => {
                write!(f, "failed to read {}: {error}", path.display())
            }
            GeneratorError::ManifestParse { path, error } => {
                write!(f, "failed to parse {}: {error}", path.display())
            }
            GeneratorError::UnknownNightlyEditor {
                version,
                manifest_path,
            } => write!(
                f,
                "nightly editor `{version}` is not declared under [[editors]] in {}",
                manifest_path.display()
            ),
            GeneratorError::InvalidJobFilter { pattern, error } => {
                write!(f, "invalid --only glob `{pattern}`: {error}")
            }
            GeneratorError::RenderJobFile { filepath, error } => {
                write!(f, "failed to render job document {filepath}: {error}")
            }
            GeneratorError::CreateOutputDir { path, error } => {
                write!(f, "failed to create output directory {}: {error}", path.display())
            }
            GeneratorError::WriteJobFile { path, error } => {
                write!(f, "failed to write {}: {error}", path.display())
            }
            GeneratorError::Json(error) => write!(f, "failed to render json report: {error}"),
        }
    }
}

impl std::error::Error for GeneratorError {}

impl From<ResolveError> for GeneratorError {
    fn from(value: ResolveError) -> Self {
        Self::Resolve(value)
    }
}

impl From<JobError> for GeneratorError {
    fn from(value: JobError) -> Self {
        Self::Job(value)
    }
}

impl From<crate::ui::UiError> for GeneratorError {
    fn from(value: crate::ui::UiError) -> Self {
        Self::Ui(value.to_string())
    }
}

pub fn run_command(cmd: Command) -> Result<String, GeneratorError> {
    match cmd {
        Command::Help => Ok(String::new()),
        Command::Generate(args) => run_generate(args),
        Command::Jobs(args) => run_jobs(args),
    }
}

pub fn run_generate(args: GenerateArgs) -> Result<String, GeneratorError> {
    let GenerateArgs {
        repo_override,
        only,
        dry_run,
        verbose_root,
        output_json,
    } = args;
    let cwd = std::env::current_dir().map_err(GeneratorError::Cwd)?;
    let resolved = resolve_target_root(cwd, repo_override)?;
    let loaded = load_manifest(&resolved.resolved_root)?;
    let namer = ConventionNamer::with_graph_dir(loaded.manifest.output_dir());

    let planned = plan_jobs(&loaded, &namer)?;
    let planned = filter_jobs(planned, only.as_deref())?;
    let emitted = emit_job_files(&resolved.resolved_root, &planned, dry_run)?;

    if output_json {
        let report = JsonGenerateReport {
            root: resolved.resolved_root.display().to_string(),
            manifest: loaded.manifest_path.display().to_string(),
            dry_run,
            jobs: json_jobs(&planned),
            files: emitted
                .iter()
                .map(|file| JsonFile {
                    file: file.filepath.clone(),
                    jobs: file.job_ids.clone(),
                    bytes: file.bytes,
                })
                .collect(),
        };
        return serde_json::to_string_pretty(&report).map_err(GeneratorError::Json);
    }

    let color_enabled =
        resolve_color_enabled(OutputMode::from_env(), std::io::stdout().is_terminal());
    let mut renderer = PlainRenderer::new(Vec::<u8>::new(), color_enabled);
    renderer.section("Job Graph")?;
    renderer.key_values(&[
        KeyValue::new("root", resolved.resolved_root.display().to_string()),
        KeyValue::new("manifest", loaded.manifest_path.display().to_string()),
        KeyValue::new("jobs", planned.len().to_string()),
        KeyValue::new("mode", if dry_run { "dry-run" } else { "write" }),
    ])?;
    renderer.text("")?;

    if verbose_root {
        renderer.bullet_list("resolution evidence", &resolved.evidence)?;
        renderer.text("")?;
    }

    let mut warn = 0;
    if planned.is_empty() {
        renderer.notice(NoticeLevel::Warning, "no jobs planned for emission")?;
        warn += 1;
    } else {
        for file in &emitted {
            let state = if dry_run {
                StepState::Pending
            } else {
                StepState::Done
            };
            renderer.step(
                &format!(
                    "{} ({} job(s), {} bytes)",
                    file.filepath,
                    file.job_ids.len(),
                    file.bytes
                ),
                state,
            )?;
        }
    }
    renderer.text("")?;
    renderer.summary(SummaryCounts {
        ok: emitted.len(),
        warn,
        err: 0,
    })?;
    render_to_string(renderer)
}

pub fn run_jobs(args: JobsArgs) -> Result<String, GeneratorError> {
    let cwd = std::env::current_dir().map_err(GeneratorError::Cwd)?;
    let resolved = resolve_target_root(cwd, args.repo_override)?;
    let loaded = load_manifest(&resolved.resolved_root)?;
    let namer = ConventionNamer::with_graph_dir(loaded.manifest.output_dir());

    let mut planned = plan_jobs(&loaded, &namer)?;
    if let Some(filter) = &args.job_name {
        planned.retain(|job| &job.job_id == filter);
    }

    if args.output_json {
        let report = JsonJobsReport {
            root: resolved.resolved_root.display().to_string(),
            manifest: loaded.manifest_path.display().to_string(),
            jobs: json_jobs(&planned),
        };
        return serde_json::to_string_pretty(&report).map_err(GeneratorError::Json);
    }

    let color_enabled =
        resolve_color_enabled(OutputMode::from_env(), std::io::stdout().is_terminal());
    let mut renderer = PlainRenderer::new(Vec::<u8>::new(), color_enabled);
    renderer.section("Planned Jobs")?;
    renderer.key_values(&[
        KeyValue::new("manifest", loaded.manifest_path.display().to_string()),
        KeyValue::new("jobs", planned.len().to_string()),
    ])?;
    renderer.text("")?;

    if planned.is_empty() {
        renderer.notice(NoticeLevel::Warning, "no matches")?;
        renderer.text("")?;
        renderer.summary(SummaryCounts {
            ok: 0,
            warn: 1,
            err: 0,
        })?;
        return render_to_string(renderer);
    }

    let rows = planned
        .iter()
        .map(|job| {
            vec![
                job.job_id.clone(),
                job.filepath.clone(),
                job.dependency_count.to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    renderer.table(&TableSpec::new(
        vec![
            "job".to_owned(),
            "file".to_owned(),
            "dependencies".to_owned(),
        ],
        rows,
    ))?;
    renderer.text("")?;
    renderer.summary(SummaryCounts {
        ok: planned.len(),
        warn: 0,
        err: 0,
    })?;
    render_to_string(renderer)
}

fn load_manifest(root: &Path) -> Result<LoadedManifest, GeneratorError> {
    let manifest_path = root.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(GeneratorError::ManifestMissing {
            root: root.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(&manifest_path).map_err(|error| GeneratorError::ManifestRead {
        path: manifest_path.clone(),
        error,
    })?;
    let manifest = toml::from_str(&raw).map_err(|error| GeneratorError::ManifestParse {
        path: manifest_path.clone(),
        error,
    })?;
    Ok(LoadedManifest {
        manifest_path,
        manifest,
    })
}

fn plan_jobs(
    loaded: &LoadedManifest,
    namer: &dyn JobNamer,
) -> Result<Vec<PlannedJob>, GeneratorError> {
    let manifest = &loaded.manifest;
    let Some(nightly) = &manifest.nightly else {
        return Ok(Vec::new());
    };

    let mut planned = Vec::new();
    for version in &nightly.editors {
        let Some(editor) = manifest.editor(version) else {
            return Err(GeneratorError::UnknownNightlyEditor {
                version: version.clone(),
                manifest_path: loaded.manifest_path.clone(),
            });
        };
        let job = AbvNightlyJob::new(
            namer,
            editor,
            &manifest.projects,
            &manifest.test_platforms,
            nightly,
        )?;
        let dependency_count = job
            .yml
            .get("dependencies")
            .and_then(serde_yaml::Value::as_sequence)
            .map(Vec::len)
            .unwrap_or_default();
        planned.push(PlannedJob {
            job_id: job.job_id,
            filepath: namer.abv_filepath(),
            dependency_count,
            yml: job.yml,
        });
    }
    Ok(planned)
}

fn filter_jobs(
    planned: Vec<PlannedJob>,
    only: Option<&str>,
) -> Result<Vec<PlannedJob>, GeneratorError> {
    let Some(pattern) = only else {
        return Ok(planned);
    };
    let matcher = globset::Glob::new(pattern)
        .map_err(|error| GeneratorError::InvalidJobFilter {
            pattern: pattern.to_owned(),
            error,
        })?
        .compile_matcher();
    Ok(planned
        .into_iter()
        .filter(|job| matcher.is_match(&job.job_id))
        .collect())
}

fn json_jobs(planned: &[PlannedJob]) -> Vec<JsonJob> {
    planned
        .iter()
        .map(|job| JsonJob {
            job_id: job.job_id.clone(),
            file: job.filepath.clone(),
            dependencies: job.dependency_count,
        })
        .collect()
}

fn render_to_string(renderer: PlainRenderer<Vec<u8>>) -> Result<String, GeneratorError> {
    String::from_utf8(renderer.into_inner())
        .map_err(|error| GeneratorError::Ui(format!("invalid utf-8 in rendered output: {error}")))
}

#[cfg(test)]
#[path = "../tests/generator_tests.rs"]
mod tests;
