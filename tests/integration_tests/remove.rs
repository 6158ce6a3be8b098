use std::fs;

use rstest::rstest;

use crate::common::{TestRepo, assert_success, last_line, repo, repo_with_feature, stderr, stdout};

#[rstest]
fn test_safe_delete_refuses_dirty_worktree(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let wt = repo.worktree_path("feature");
    fs::write(wt.join("new.txt"), "draft").unwrap();

    let output = repo.wt(&["-d", "feature"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("-D"), "{}", stderr(&output));
    assert!(wt.is_dir());
    assert!(repo.has_branch("feature"));
    assert_eq!(repo.worktree_paths().len(), 2);
}

#[rstest]
fn test_safe_delete_clean_merged(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let output = repo.wt(&["-d", "feature"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Deleted worktree and branch feature"));
    assert!(!repo.worktree_path("feature").exists());
    assert!(!repo.has_branch("feature"));
    assert_eq!(repo.worktree_paths().len(), 1);
}

#[rstest]
fn test_safe_delete_keeps_unmerged_branch(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let wt = repo.worktree_path("feature");
    repo.commit_file(&wt, "feature.txt", "work", "Feature work");

    let output = repo.wt(&["-d", "feature"]);
    assert_success(&output);
    assert!(!wt.exists());
    assert!(repo.has_branch("feature"), "unmerged branch must survive -d");
    assert!(
        stderr(&output).contains("failed to delete branch"),
        "{}",
        stderr(&output)
    );
}

#[rstest]
fn test_force_delete_dirty_and_unmerged(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let wt = repo.worktree_path("feature");
    repo.commit_file(&wt, "feature.txt", "work", "Feature work");
    fs::write(wt.join("untracked.txt"), "x").unwrap();

    let output = repo.wt(&["-D", "feature"]);
    assert_success(&output);
    assert!(!wt.exists());
    assert!(!repo.has_branch("feature"));
}

#[rstest]
fn test_default_branch_protection(repo: TestRepo) {
    let output = repo.wt(&["-D", "main"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("--allow-delete-default"),
        "{}",
        stderr(&output)
    );
    assert!(repo.has_branch("main"));
    assert_eq!(repo.worktree_paths().len(), 1);

    // git refuses to delete a branch checked out anywhere
    repo.run_git(&["checkout", "-q", "--detach"]);
    let output = repo.wt(&["-D", "--allow-delete-default", "main"]);
    assert_success(&output);
    assert!(!repo.has_branch("main"));
}

#[rstest]
fn test_default_branch_worktree_removed_branch_kept(repo: TestRepo) {
    repo.run_git(&["checkout", "-q", "--detach"]);
    assert_success(&repo.wt(&["main"]));
    let wt = repo.worktree_path("main");
    assert!(wt.is_dir());

    let output = repo.wt(&["-D", "main"]);
    assert_success(&output);
    assert!(!wt.exists());
    assert!(repo.has_branch("main"));
    assert!(stdout(&output).contains("kept default branch"));
}

#[rstest]
fn test_allow_delete_default_from_config(repo: TestRepo) {
    repo.run_git(&["checkout", "-q", "--detach"]);
    repo.set_config("wt.allowdeletedefault", "true");
    assert_success(&repo.wt(&["-D", "main"]));
    assert!(!repo.has_branch("main"));
}

#[rstest]
fn test_delete_current_worktree_with_shell_integration(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let wt = repo.worktree_path("feature");

    let output = repo.wt_integrated(&wt, &["-D", "feature"]);
    assert_success(&output);
    assert_eq!(last_line(&output), repo.root_path().display().to_string());
    assert!(!wt.exists());
    assert_eq!(repo.worktree_paths().len(), 1);
}

#[rstest]
fn test_delete_current_worktree_without_integration(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let wt = repo.worktree_path("feature");

    let output = repo.wt_in(&wt, &["-D", "feature"]);
    assert_success(&output);
    assert!(!stdout(&output).contains(&format!("{}\n", repo.root_path().display())));
    assert!(!wt.exists());
}

#[rstest]
fn test_delete_other_worktree_does_not_print_root(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let output = repo.wt_integrated(repo.root_path(), &["-D", "feature"]);
    assert_success(&output);
    assert_ne!(last_line(&output), repo.root_path().display().to_string());
}

#[rstest]
fn test_no_match(repo: TestRepo) {
    let output = repo.wt(&["-d", "nope"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("no worktree or branch found for `nope`"),
        "{}",
        stderr(&output)
    );
}

#[rstest]
fn test_branch_without_worktree(repo: TestRepo) {
    repo.run_git(&["branch", "topic"]);
    let output = repo.wt(&["-d", "topic"]);
    assert_success(&output);
    assert!(!repo.has_branch("topic"));
    assert!(stdout(&output).contains("Deleted branch topic"));
}

#[rstest]
fn test_duplicate_tokens_delete_once(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let output = repo.wt(&["-D", "feature", "feature"]);
    assert_success(&output);
    assert_eq!(stdout(&output).matches("Deleted").count(), 1);
}

#[rstest]
fn test_multiple_tokens_in_order(repo: TestRepo) {
    assert_success(&repo.wt(&["one"]));
    assert_success(&repo.wt(&["two"]));

    let output = repo.wt(&["-D", "two", "one"]);
    assert_success(&output);
    let out = stdout(&output);
    let two = out.find("two").unwrap();
    let one = out.find("one").unwrap();
    assert!(two < one, "{out}");
    assert_eq!(repo.worktree_paths().len(), 1);
}

#[rstest]
fn test_stops_at_first_failure(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let output = repo.wt(&["-D", "nope", "feature"]);
    assert!(!output.status.success());
    assert!(repo.worktree_path("feature").is_dir());
}

#[rstest]
fn test_delete_by_path(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let output = repo.wt(&["-D", ".wt/feature"]);
    assert_success(&output);
    assert!(!repo.worktree_path("feature").exists());
}

#[rstest]
fn test_main_worktree_is_never_removed(repo: TestRepo) {
    let output = repo.wt(&["-D", "."]);
    assert!(!output.status.success());
    assert!(repo.root_path().join("README.md").is_file());
}

#[rstest]
fn test_custom_remover(repo_with_feature: TestRepo) {
    let repo = repo_with_feature;
    let wt = repo.worktree_path("feature");

    let output = repo.wt(&["-D", "--remover", "rm -rf", "feature"]);
    assert_success(&output);
    assert!(!wt.exists());
    // Pruned from git's bookkeeping
    assert_eq!(repo.worktree_paths().len(), 1);
    assert!(!repo.has_branch("feature"));
}

#[rstest]
fn test_bare_repository_is_rejected(repo: TestRepo) {
    let bare = repo.temp_path().join("bare.git");
    repo.run_git(&["clone", "-q", "--bare", ".", bare.to_str().unwrap()]);

    let output = repo.wt_in(&bare, &["-D", "main"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("bare"), "{}", stderr(&output));
}

#[rstest]
fn test_delete_requires_token(repo: TestRepo) {
    let output = repo.wt(&["-d"]);
    assert_eq!(output.status.code(), Some(2));
}
