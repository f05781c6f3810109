pub mod generator;
pub mod jobs;
pub mod namer;
pub mod resolver;
pub mod ui;
pub mod yml;

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(GenerateArgs),
    Jobs(JobsArgs),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerateArgs {
    pub repo_override: Option<PathBuf>,
    pub only: Option<String>,
    pub dry_run: bool,
    pub verbose_root: bool,
    pub output_json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobsArgs {
    pub repo_override: Option<PathBuf>,
    pub job_name: Option<String>,
    pub output_json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliParseError {
    MissingRepoValue,
    MissingOnlyValue,
    MissingJobValue,
    UnknownCommand(String),
    UnknownArgument(String),
}

impl std::fmt::Display for CliParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliParseError::MissingRepoValue => write!(f, "--repo requires a value"),
            CliParseError::MissingOnlyValue => write!(f, "--only requires a value"),
            CliParseError::MissingJobValue => write!(f, "--job requires a value"),
            CliParseError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            CliParseError::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliParseError {}

pub fn parse_command<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(cmd) = args.next() else {
        return Ok(Command::Help);
    };

    if cmd == "--help" || cmd == "-h" {
        return Ok(Command::Help);
    }

    if cmd == "generate" {
        return parse_generate(args);
    }
    if cmd == "jobs" {
        return parse_jobs(args);
    }

    Err(CliParseError::UnknownCommand(cmd))
}

fn parse_generate<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = GenerateArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--repo" => {
                let Some(path) = args.next() else {
                    return Err(CliParseError::MissingRepoValue);
                };
                parsed.repo_override = Some(PathBuf::from(path));
            }
            "--only" => {
                let Some(pattern) = args.next() else {
                    return Err(CliParseError::MissingOnlyValue);
                };
                parsed.only = Some(pattern);
            }
            "--dry-run" => {
                parsed.dry_run = true;
            }
            "--verbose-root" => {
                parsed.verbose_root = true;
            }
            "--json" => {
                parsed.output_json = true;
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(CliParseError::UnknownArgument(other.to_owned())),
        }
    }

    Ok(Command::Generate(parsed))
}

fn parse_jobs<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = JobsArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--repo" => {
                let Some(path) = args.next() else {
                    return Err(CliParseError::MissingRepoValue);
                };
                parsed.repo_override = Some(PathBuf::from(path));
            }
            "--job" => {
                let Some(name) = args.next() else {
                    return Err(CliParseError::MissingJobValue);
                };
                parsed.job_name = Some(name);
            }
            "--json" => {
                parsed.output_json = true;
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(CliParseError::UnknownArgument(other.to_owned())),
        }
    }

    Ok(Command::Jobs(parsed))
}

pub fn print_usage() {
    eprintln!(
        "gantry\n\nUSAGE:\n  gantry generate [--repo <PATH>] [--only <GLOB>] [--dry-run] [--verbose-root] [--json]\n  gantry jobs [--repo <PATH>] [--job <NAME>] [--json]\n\nCOMMANDS:\n  generate          Emit the job graph YAML files described by gantry.toml\n  jobs              List the jobs the manifest would generate\n\nOPTIONS (generate):\n  --repo <PATH>     Override target repository path\n  --only <GLOB>     Only emit jobs whose id matches the glob\n  --dry-run         Plan and render without writing files\n  --verbose-root    Print root resolution evidence\n  --json            Emit a machine-readable JSON report\n\nOPTIONS (jobs):\n  --repo <PATH>     Override target repository path\n  --job <NAME>      Filter output to a single job id\n  --json            Emit a machine-readable JSON report\n\nGENERAL:\n  -h, --help        Print help\n"
    );
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
