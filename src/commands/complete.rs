//! Hidden `--complete`: candidates for the shell completion functions.
//!
//! One candidate per line as `name<TAB>description`. Worktree branches come
//! first, then local branches without a worktree, then remote branches.

use git_wt::git::Repository;
use indexmap::IndexSet;

use crate::output;

pub fn handle_complete() -> anyhow::Result<()> {
    let repo = Repository::current();
    for name in candidates(&repo)? {
        let description = repo.commit_message(&name);
        output::stdout(format_candidate(&name, &description))?;
    }
    Ok(())
}

fn candidates(repo: &Repository) -> anyhow::Result<IndexSet<String>> {
    let mut names: IndexSet<String> = repo
        .list_worktrees()?
        .iter()
        .filter_map(|wt| wt.checked_out_branch().map(str::to_string))
        .collect();
    names.extend(repo.list_local_branches()?);
    names.extend(repo.list_remote_branches()?);
    Ok(names)
}

fn format_candidate(name: &str, description: &str) -> String {
    // Tabs or newlines in a subject would break the line format
    let description: String = description
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    format!("{name}\t{description}")
}
