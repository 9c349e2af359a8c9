//! Source tree revision lookup.

use std::path::Path;

use git2::{Repository, StatusOptions};

/// Revision of the git checkout containing `dir`.
///
/// Returns `None` when `dir` is not inside a git repository or HEAD does not
/// point at a commit yet. A `-dirty` suffix marks uncommitted changes to
/// tracked files.
pub fn source_revision(dir: &Path) -> Option<String> {
    let repo = Repository::discover(dir).ok()?;
    let commit = repo.head().ok()?.peel_to_commit().ok()?;
    let mut revision = commit.id().to_string();

    let mut opts = StatusOptions::new();
    opts.include_untracked(false).include_ignored(false);
    match repo.statuses(Some(&mut opts)) {
        Ok(statuses) if !statuses.is_empty() => revision.push_str("-dirty"),
        Ok(_) => {}
        Err(e) => tracing::warn!("could not read git status of {}: {}", dir.display(), e),
    }

    Some(revision)
}
