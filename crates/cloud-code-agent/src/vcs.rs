use crate::error::AgentLoopResult;
use cloud_code_core::{ChangeType, CommitRecord, FileChange};
use git2::{Repository, Signature, StatusOptions};

const SHORT_SHA_LEN: usize = 7;

/// Scans the workspace's working tree for changes relative to the index and
/// HEAD, decoding each entry's git2 status bits into a [`ChangeType`].
///
/// Line counts are not tracked here (git2's status API reports presence, not
/// diff stats); both counters are left at zero.
pub fn collect_changed_files(repo: &Repository) -> AgentLoopResult<Vec<FileChange>> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true).recurse_untracked_dirs(true);

    let statuses = repo.statuses(Some(&mut opts))?;
    let mut changes = Vec::new();

    for entry in statuses.iter() {
        let Some(path) = entry.path() else { continue };
        let status = entry.status();

        let change_type = if status.is_wt_new() || status.is_index_new() {
            ChangeType::Created
        } else if status.is_wt_deleted() || status.is_index_deleted() {
            ChangeType::Deleted
        } else {
            ChangeType::Modified
        };

        changes.push(FileChange {
            path: path.to_string(),
            change_type,
            lines_added: 0,
            lines_removed: 0,
        });
    }

    Ok(changes)
}

/// Stages every change in the working tree and creates a single commit on
/// top of the current `HEAD`, returning its short sha and message.
pub fn commit_task(repo: &Repository, task: &cloud_code_core::Task) -> AgentLoopResult<CommitRecord> {
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
    index.update_all(["*"].iter(), None)?;
    index.write()?;
    let tree_oid = index.write_tree()?;
    let tree = repo.find_tree(tree_oid)?;

    let signature = repo
        .signature()
        .or_else(|_| Signature::now("cloud-code-agent", "agent@cloud-code.dev"))?;

    let message = format!("feat: {}\n\nTask ID: {}", task.title, task.id);

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let commit_oid = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        &message,
        &tree,
        &parents,
    )?;

    Ok(CommitRecord {
        sha: commit_oid.to_string().chars().take(SHORT_SHA_LEN).collect(),
        message,
    })
}
