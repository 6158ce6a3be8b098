//! `git wt` with no arguments: list worktrees as a table or JSON.

use std::path::{Path, PathBuf};

use anstyle::Style;
use anyhow::Context;
use git_wt::git::{Repository, Worktree};
use git_wt::styling::{BOLD, DIM, align_columns};
use serde::Serialize;

use crate::output;

/// One worktree in `--json` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonItem {
    pub path: PathBuf,
    pub branch: String,
    pub head: String,
    pub bare: bool,
    /// True for the worktree this command ran in.
    pub current: bool,
}

impl JsonItem {
    fn new(wt: &Worktree, current_root: Option<&Path>) -> Self {
        Self {
            path: wt.path.clone(),
            branch: wt.branch.clone(),
            head: wt.head.clone(),
            bare: wt.bare,
            current: current_root.is_some_and(|root| wt.is_at(root)),
        }
    }
}

pub fn handle_list(json: bool) -> anyhow::Result<()> {
    let repo = Repository::current();
    let worktrees = repo.list_worktrees()?;
    // Outside any working tree (e.g. in a bare repo) nothing is current.
    let current_root = repo.worktree_root().ok();
    let items: Vec<JsonItem> = worktrees
        .iter()
        .map(|wt| JsonItem::new(wt, current_root))
        .collect();

    if json {
        let rendered =
            serde_json::to_string_pretty(&items).context("Failed to serialize worktrees")?;
        output::stdout_raw(&rendered)?;
    } else {
        let lines = render_table(&items);
        for (i, line) in lines.iter().enumerate() {
            let style = match i {
                0 => DIM,
                i if items[i - 1].current => BOLD,
                _ => Style::new(),
            };
            output::stdout(format!("{style}{line}{style:#}"))?;
        }
    }
    Ok(())
}

fn render_table(items: &[JsonItem]) -> Vec<String> {
    let header = ["", "PATH", "BRANCH", "HEAD"].map(String::from).to_vec();
    let rows = std::iter::once(header).chain(items.iter().map(|item| {
        vec![
            if item.current { "*" } else { "" }.to_string(),
            item.path.display().to_string(),
            if item.bare {
                "(bare)".to_string()
            } else {
                item.branch.clone()
            },
            item.head.clone(),
        ]
    }));
    align_columns(&rows.collect::<Vec<_>>())
}
