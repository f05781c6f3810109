use std::fs;
use std::path::{Path, PathBuf};

const ROOT_MARKERS: [&str; 2] = ["gantry.toml", ".git"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    Explicit,
    AutoNearest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub resolved_root: PathBuf,
    pub resolution_mode: ResolutionMode,
    pub evidence: Vec<String>,
}

#[derive(Debug)]
pub enum ResolveError {
    InvalidExplicitRoot { path: PathBuf },
    NoCandidateRoot { cwd: PathBuf },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::InvalidExplicitRoot { path } => {
                write!(
                    f,
                    "explicit --repo path is not a directory: {}",
                    path.display()
                )
            }
            ResolveError::NoCandidateRoot { cwd } => write!(
                f,
                "could not resolve a target root from cwd {} (use --repo <path>)",
                cwd.display()
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

pub fn resolve_target_root(
    cwd: PathBuf,
    repo_override: Option<PathBuf>,
) -> Result<ResolvedTarget, ResolveError> {
    if let Some(explicit) = repo_override {
        let canonical = canonicalize_best_effort(explicit);
        if !canonical.is_dir() {
            return Err(ResolveError::InvalidExplicitRoot { path: canonical });
        }
        return Ok(ResolvedTarget {
            resolved_root: canonical,
            resolution_mode: ResolutionMode::Explicit,
            evidence: vec!["resolved via explicit --repo override".to_owned()],
        });
    }

    let nearest = find_nearest_candidate(&cwd).ok_or(ResolveError::NoCandidateRoot { cwd })?;
    let markers = present_markers(&nearest);

    Ok(ResolvedTarget {
        evidence: vec![format!(
            "selected nearest root candidate {} (markers: {})",
            nearest.display(),
            markers.join(", ")
        )],
        resolved_root: nearest,
        resolution_mode: ResolutionMode::AutoNearest,
    })
}

fn find_nearest_candidate(cwd: &Path) -> Option<PathBuf> {
    let mut current = Some(canonicalize_best_effort(cwd.to_path_buf()));
    while let Some(path) = current {
        if is_candidate_root(&path) {
            return Some(path);
        }
        current = path.parent().map(Path::to_path_buf);
    }
    None
}

fn is_candidate_root(path: &Path) -> bool {
    ROOT_MARKERS.iter().any(|marker| path.join(marker).exists())
}

fn present_markers(path: &Path) -> Vec<&'static str> {
    ROOT_MARKERS
        .iter()
        .copied()
        .filter(|marker| path.join(marker).exists())
        .collect()
}

fn canonicalize_best_effort(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
