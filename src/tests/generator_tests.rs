use super::{load_manifest, plan_jobs, run_generate, run_jobs, GeneratorError};
use crate::jobs::JobError;
use crate::namer::ConventionNamer;
use crate::{GenerateArgs, JobsArgs};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const FULL_MANIFEST: &str = r#"
[[editors]]
version = "trunk"

[[editors]]
version = "2020.1"

[[test_platforms]]
name = "Standalone_OSX"

[[projects]]
name = "ProjA"

[nightly]
editors = ["trunk", "2020.1"]
allowed_editors = ["trunk", "2020.1"]

[[nightly.additional_jobs]]
project_name = "ProjA"
platform_name = "Win64"
api_name = "d3d11"
test_platform_names = ["Editmode"]
"#;

fn temp_workspace(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("gantry-{prefix}-{nanos}"));
    fs::create_dir_all(&dir).expect("create temp workspace");
    fs::canonicalize(&dir).unwrap_or(dir)
}

fn write_manifest(root: &PathBuf, contents: &str) {
    fs::write(root.join("gantry.toml"), contents).expect("write manifest");
}

#[test]
fn generate_writes_one_document_per_target_file() {
    let root = temp_workspace("generate-write");
    write_manifest(&root, FULL_MANIFEST);

    let output = run_generate(GenerateArgs {
        repo_override: Some(root.clone()),
        ..GenerateArgs::default()
    })
    .expect("generate succeeds");

    assert!(output.contains("Job Graph"));
    assert!(output.contains(".graph/_abv.yml"));

    let rendered = fs::read_to_string(root.join(".graph").join("_abv.yml")).expect("file written");
    let document: serde_yaml::Value = serde_yaml::from_str(&rendered).expect("valid yaml");
    let mapping = document.as_mapping().expect("mapping document");

    let job_ids = mapping
        .keys()
        .map(|key| key.as_str().expect("string key"))
        .collect::<Vec<&str>>();
    assert_eq!(
        job_ids,
        vec![
            "all_project_ci_nightly_trunk",
            "all_project_ci_nightly_2020.1",
        ]
    );

    let trunk_job = mapping
        .get("all_project_ci_nightly_trunk")
        .expect("trunk job");
    assert_eq!(
        trunk_job.get("name").and_then(serde_yaml::Value::as_str),
        Some("_Nightly ABV against trunk")
    );
    let dependencies = trunk_job
        .get("dependencies")
        .and_then(serde_yaml::Value::as_sequence)
        .expect("dependencies");
    assert_eq!(dependencies.len(), 3);
    assert_eq!(
        dependencies[0].get("path").and_then(serde_yaml::Value::as_str),
        Some(".graph/_abv.yml#all_project_ci_trunk")
    );
}

#[test]
fn generate_dry_run_plans_without_writing() {
    let root = temp_workspace("generate-dry");
    write_manifest(&root, FULL_MANIFEST);

    let output = run_generate(GenerateArgs {
        repo_override: Some(root.clone()),
        dry_run: true,
        ..GenerateArgs::default()
    })
    .expect("dry run succeeds");

    assert!(output.contains("dry-run"));
    assert!(!root.join(".graph").exists());
}

#[test]
fn generate_honors_the_only_filter() {
    let root = temp_workspace("generate-only");
    write_manifest(&root, FULL_MANIFEST);

    let output = run_generate(GenerateArgs {
        repo_override: Some(root.clone()),
        only: Some("*_trunk".to_owned()),
        ..GenerateArgs::default()
    })
    .expect("generate succeeds");
    assert!(output.contains("1 job(s)"));

    let rendered = fs::read_to_string(root.join(".graph").join("_abv.yml")).expect("file written");
    assert!(rendered.contains("all_project_ci_nightly_trunk"));
    assert!(!rendered.contains("all_project_ci_nightly_2020.1"));
}

#[test]
fn generate_with_filter_matching_nothing_emits_nothing() {
    let root = temp_workspace("generate-only-empty");
    write_manifest(&root, FULL_MANIFEST);

    let output = run_generate(GenerateArgs {
        repo_override: Some(root.clone()),
        only: Some("does_not_exist_*".to_owned()),
        ..GenerateArgs::default()
    })
    .expect("generate succeeds");

    assert!(output.contains("no jobs planned"));
    assert!(!root.join(".graph").exists());
}

#[test]
fn generate_rejects_an_invalid_only_glob() {
    let root = temp_workspace("generate-bad-glob");
    write_manifest(&root, FULL_MANIFEST);

    let err = run_generate(GenerateArgs {
        repo_override: Some(root),
        only: Some("nightly[".to_owned()),
        ..GenerateArgs::default()
    })
    .expect_err("invalid glob must fail");
    assert!(matches!(err, GeneratorError::InvalidJobFilter { .. }));
}

#[test]
fn generate_json_report_lists_planned_jobs_and_files() {
    let root = temp_workspace("generate-json");
    write_manifest(&root, FULL_MANIFEST);

    let output = run_generate(GenerateArgs {
        repo_override: Some(root),
        dry_run: true,
        output_json: true,
        ..GenerateArgs::default()
    })
    .expect("generate succeeds");

    let report: serde_json::Value = serde_json::from_str(&output).expect("valid json");
    assert_eq!(report["dry_run"], serde_json::Value::Bool(true));
    assert_eq!(report["jobs"][0]["job_id"], "all_project_ci_nightly_trunk");
    assert_eq!(report["jobs"][0]["dependencies"], 3);
    assert_eq!(report["files"][0]["file"], ".graph/_abv.yml");
}

#[test]
fn missing_manifest_is_a_distinct_error() {
    let root = temp_workspace("generate-missing-manifest");

    let err = run_generate(GenerateArgs {
        repo_override: Some(root),
        ..GenerateArgs::default()
    })
    .expect_err("missing manifest must fail");
    assert!(matches!(err, GeneratorError::ManifestMissing { .. }));
    assert!(err.to_string().contains("gantry.toml"));
}

#[test]
fn malformed_manifest_reports_the_parse_failure() {
    let root = temp_workspace("generate-bad-manifest");
    write_manifest(&root, "editors = \"not a table\"\n");

    let err = run_generate(GenerateArgs {
        repo_override: Some(root),
        ..GenerateArgs::default()
    })
    .expect_err("parse failure expected");
    assert!(matches!(err, GeneratorError::ManifestParse { .. }));
}

#[test]
fn unknown_manifest_table_is_rejected() {
    let root = temp_workspace("generate-unknown-table");
    write_manifest(&root, "[surprise]\nkey = true\n");

    let err = run_generate(GenerateArgs {
        repo_override: Some(root),
        ..GenerateArgs::default()
    })
    .expect_err("unknown table must fail");
    assert!(matches!(err, GeneratorError::ManifestParse { .. }));
}

#[test]
fn nightly_editor_missing_from_the_editor_list_fails() {
    let root = temp_workspace("generate-unknown-editor");
    write_manifest(
        &root,
        r#"
[[editors]]
version = "trunk"

[nightly]
editors = ["2021.2"]
allowed_editors = ["2021.2"]
"#,
    );

    let err = run_generate(GenerateArgs {
        repo_override: Some(root),
        ..GenerateArgs::default()
    })
    .expect_err("unknown nightly editor must fail");
    assert!(
        matches!(&err, GeneratorError::UnknownNightlyEditor { version, .. } if version == "2021.2")
    );
}

#[test]
fn nightly_editor_outside_the_allow_list_propagates_the_job_error() {
    let root = temp_workspace("generate-disallowed-editor");
    write_manifest(
        &root,
        r#"
[[editors]]
version = "trunk"

[nightly]
editors = ["trunk"]
allowed_editors = ["2020.1"]
"#,
    );

    let err = run_generate(GenerateArgs {
        repo_override: Some(root.clone()),
        ..GenerateArgs::default()
    })
    .expect_err("disallowed editor must fail");
    assert!(matches!(
        &err,
        GeneratorError::Job(JobError::NightlyVersionNotAllowed { version }) if version == "trunk"
    ));
    assert_eq!(
        err.to_string(),
        "tried to construct nightly with PR trigger for version trunk"
    );
    assert!(!root.join(".graph").exists());
}

#[test]
fn manifest_without_a_nightly_table_plans_nothing() {
    let root = temp_workspace("generate-no-nightly");
    write_manifest(&root, "[[editors]]\nversion = \"trunk\"\n");

    let output = run_generate(GenerateArgs {
        repo_override: Some(root.clone()),
        ..GenerateArgs::default()
    })
    .expect("generate succeeds");
    assert!(output.contains("no jobs planned"));
    assert!(!root.join(".graph").exists());
}

#[test]
fn plan_respects_a_custom_output_dir() {
    let root = temp_workspace("generate-output-dir");
    write_manifest(
        &root,
        r#"
[graph]
output_dir = "ci"

[[editors]]
version = "trunk"

[nightly]
editors = ["trunk"]
allowed_editors = ["trunk"]
"#,
    );

    let loaded = load_manifest(&root).expect("manifest loads");
    let namer = ConventionNamer::with_graph_dir(loaded.manifest.output_dir());
    let planned = plan_jobs(&loaded, &namer).expect("plan succeeds");
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].filepath, "ci/_abv.yml");

    run_generate(GenerateArgs {
        repo_override: Some(root.clone()),
        ..GenerateArgs::default()
    })
    .expect("generate succeeds");
    assert!(root.join("ci").join("_abv.yml").is_file());
}

#[test]
fn jobs_listing_tabulates_planned_jobs() {
    let root = temp_workspace("jobs-list");
    write_manifest(&root, FULL_MANIFEST);

    let output = run_jobs(JobsArgs {
        repo_override: Some(root),
        ..JobsArgs::default()
    })
    .expect("jobs succeeds");

    assert!(output.contains("Planned Jobs"));
    assert!(output.contains("all_project_ci_nightly_trunk"));
    assert!(output.contains("all_project_ci_nightly_2020.1"));
    assert!(output.contains(".graph/_abv.yml"));
}

#[test]
fn jobs_filter_without_matches_warns() {
    let root = temp_workspace("jobs-no-match");
    write_manifest(&root, FULL_MANIFEST);

    let output = run_jobs(JobsArgs {
        repo_override: Some(root),
        job_name: Some("all_project_ci_nightly_2019.4".to_owned()),
        ..JobsArgs::default()
    })
    .expect("jobs succeeds");
    assert!(output.contains("no matches"));
}

#[test]
fn jobs_json_report_round_trips() {
    let root = temp_workspace("jobs-json");
    write_manifest(&root, FULL_MANIFEST);

    let output = run_jobs(JobsArgs {
        repo_override: Some(root),
        job_name: Some("all_project_ci_nightly_trunk".to_owned()),
        output_json: true,
    })
    .expect("jobs succeeds");

    let report: serde_json::Value = serde_json::from_str(&output).expect("valid json");
    let jobs = report["jobs"].as_array().expect("jobs array");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["job_id"], "all_project_ci_nightly_trunk");
    assert_eq!(jobs[0]["file"], ".graph/_abv.yml");
}
