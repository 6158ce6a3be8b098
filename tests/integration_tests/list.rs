use rstest::rstest;
use serde_json::Value;

use crate::common::{TestRepo, assert_success, repo, repo_with_feature, stdout};

fn list_json(repo: &TestRepo, dir: &std::path::Path) -> Vec<Value> {
    let output = repo.wt_in(dir, &["--json"]);
    assert_success(&output);
    serde_json::from_str::<Value>(&stdout(&output))
        .unwrap()
        .as_array()
        .unwrap()
        .clone()
}

/// Table rows without the header, split on runs of whitespace.
fn list_rows(repo: &TestRepo, dir: &std::path::Path) -> Vec<Vec<String>> {
    let output = repo.wt_in(dir, &[]);
    assert_success(&output);
    let out = stdout(&output);
    let mut lines = out.lines();
    let header = lines.next().unwrap();
    assert_eq!(
        header.split_whitespace().collect::<Vec<_>>(),
        ["PATH", "BRANCH", "HEAD"]
    );
    lines
        .map(|line| line.split_whitespace().map(String::from).collect())
        .collect()
}

#[rstest]
fn test_list_single_worktree(repo: TestRepo) {
    let rows = list_rows(&repo, repo.root_path());
    let head = repo.git_output(&["rev-parse", "--short=7", "HEAD"]);
    assert_eq!(
        rows,
        vec![vec![
            "*".to_string(),
            repo.root_path().display().to_string(),
            "main".to_string(),
            head,
        ]]
    );
}

#[rstest]
fn test_current_marker_follows_cwd(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let wt = repo.worktree_path("feature");

    let rows = list_rows(&repo, &wt);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], repo.root_path().display().to_string());
    assert_eq!(rows[1][0], "*");
    assert_eq!(rows[1][1], wt.display().to_string());
    assert_eq!(rows[1][2], "feature");
}

#[rstest]
fn test_json_matches_table(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    repo.run_git_in(&repo.worktree_path("feature"), &["checkout", "-q", "--detach"]);

    let items = list_json(&repo, repo.root_path());
    let rows = list_rows(&repo, repo.root_path());
    assert_eq!(items.len(), rows.len());

    for row in rows {
        let current = row[0] == "*";
        let cells = if current { &row[1..] } else { &row[..] };
        let item = items
            .iter()
            .find(|item| item["path"] == cells[0].as_str())
            .unwrap_or_else(|| panic!("no JSON entry for {cells:?}"));
        assert_eq!(item["branch"], cells[1].as_str());
        assert_eq!(item["head"], cells[2].as_str());
        assert_eq!(item["current"], current);
        assert_eq!(item["bare"], false);
    }

    let detached = items
        .iter()
        .find(|item| item["branch"] == "[detached]")
        .unwrap();
    assert_eq!(detached["head"].as_str().unwrap().len(), 7);
}

#[rstest]
fn test_create_then_list_then_delete(repo: TestRepo) {
    assert_success(&repo.wt(&["topic"]));
    let branches: Vec<Value> = list_json(&repo, repo.root_path())
        .iter()
        .map(|item| item["branch"].clone())
        .collect();
    assert_eq!(branches.iter().filter(|b| *b == "topic").count(), 1);

    assert_success(&repo.wt(&["-d", "topic"]));
    let items = list_json(&repo, repo.root_path());
    assert!(items.iter().all(|item| item["branch"] != "topic"));
    assert!(!repo.has_branch("topic"));
}

#[rstest]
fn test_list_in_bare_repository(repo: TestRepo) {
    let bare = repo.temp_path().join("bare.git");
    repo.run_git(&["clone", "-q", "--bare", ".", bare.to_str().unwrap()]);

    let items = list_json(&repo, &bare);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["bare"], true);
    assert_eq!(items[0]["current"], false);

    let output = repo.wt_in(&bare, &[]);
    assert_success(&output);
    assert!(stdout(&output).contains("(bare)"));
}
