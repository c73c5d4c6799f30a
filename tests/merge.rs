use common::repository::{Sandbox, repository_error, sandbox};
use pretty_assertions::assert_eq;
use rstest::rstest;
use twig::artifacts::core::errors::RepositoryError;
use twig::artifacts::merge::MergeOutcome;

mod common;

/// Commit `a.txt = "1"` on master, fork `topic` there, then let each side commit its own
/// changes
fn diverge(
    sandbox: &mut Sandbox,
    master_changes: &[(&str, Option<&str>)],
    topic_changes: &[(&str, Option<&str>)],
) {
    sandbox.commit_file("a.txt", "1\n", "base");
    sandbox.repository.create_branch("topic").unwrap();

    apply(sandbox, master_changes, "master work");
    sandbox.repository.checkout_branch("topic").unwrap();
    apply(sandbox, topic_changes, "topic work");
    sandbox.repository.checkout_branch("master").unwrap();
}

fn apply(sandbox: &mut Sandbox, changes: &[(&str, Option<&str>)], message: &str) {
    for (name, content) in changes {
        match content {
            Some(content) => {
                sandbox.write(name, content);
                sandbox.repository.add(name).unwrap();
            }
            None => sandbox.repository.remove(name).unwrap(),
        }
    }
    sandbox.repository.commit(message).unwrap();
}

#[rstest]
fn changes_made_only_on_the_merged_branch_are_adopted(mut sandbox: Sandbox) {
    diverge(
        &mut sandbox,
        &[("b.txt", Some("master\n"))],
        &[("a.txt", Some("2\n"))],
    );
    let master_head = sandbox.repository.head_oid().unwrap();
    let topic_head = sandbox.repository.find_branch("topic").unwrap().head().clone();

    let outcome = sandbox.repository.merge("topic").unwrap();

    assert_eq!(outcome, MergeOutcome::Merged { conflicts: false });
    assert_eq!(outcome.to_string(), "");
    assert_eq!(sandbox.read("a.txt").as_deref(), Some("2\n"));
    assert_eq!(sandbox.read("b.txt").as_deref(), Some("master\n"));

    let merge_commit = sandbox.repository.head_commit().unwrap();
    assert_eq!(merge_commit.message(), "Merged topic into master.");
    assert_eq!(merge_commit.parent(), Some(&master_head));
    assert_eq!(merge_commit.merge_parent(), Some(&topic_head));
    assert!(merge_commit.tracks("a.txt") && merge_commit.tracks("b.txt"));
    assert!(sandbox.repository.stage().is_empty());
}

#[rstest]
fn diverging_edits_produce_a_committed_conflict(mut sandbox: Sandbox) {
    diverge(
        &mut sandbox,
        &[("a.txt", Some("3\n"))],
        &[("a.txt", Some("2\n"))],
    );

    let outcome = sandbox.repository.merge("topic").unwrap();

    assert_eq!(outcome, MergeOutcome::Merged { conflicts: true });
    assert_eq!(outcome.to_string(), "Encountered a merge conflict.");
    let conflicted = "<<<<<<< HEAD\n3\n=======\n2\n>>>>>>>\n";
    assert_eq!(sandbox.read("a.txt").as_deref(), Some(conflicted));

    let merge_commit = sandbox.repository.head_commit().unwrap();
    let blob = sandbox
        .repository
        .database()
        .load_blob(merge_commit.blob_id("a.txt").unwrap())
        .unwrap();
    assert_eq!(blob.content().as_ref(), conflicted.as_bytes());
}

#[rstest]
fn a_file_deleted_on_one_side_and_edited_on_the_other_conflicts(mut sandbox: Sandbox) {
    diverge(&mut sandbox, &[("a.txt", Some("3\n"))], &[("a.txt", None)]);

    let outcome = sandbox.repository.merge("topic").unwrap();

    assert_eq!(outcome, MergeOutcome::Merged { conflicts: true });
    assert_eq!(
        sandbox.read("a.txt").as_deref(),
        Some("<<<<<<< HEAD\n3\n=======\n>>>>>>>\n")
    );
}

#[rstest]
fn deletions_on_the_merged_branch_are_applied(mut sandbox: Sandbox) {
    diverge(
        &mut sandbox,
        &[("b.txt", Some("master\n"))],
        &[("a.txt", None), ("c.txt", Some("topic\n"))],
    );

    let outcome = sandbox.repository.merge("topic").unwrap();

    assert_eq!(outcome, MergeOutcome::Merged { conflicts: false });
    assert_eq!(sandbox.read("a.txt"), None);
    assert_eq!(sandbox.read("c.txt").as_deref(), Some("topic\n"));

    let merge_commit = sandbox.repository.head_commit().unwrap();
    assert!(!merge_commit.tracks("a.txt"));
    assert!(merge_commit.tracks("b.txt") && merge_commit.tracks("c.txt"));
}

#[rstest]
fn identical_changes_on_both_sides_merge_cleanly(mut sandbox: Sandbox) {
    diverge(
        &mut sandbox,
        &[("a.txt", Some("2\n")), ("b.txt", Some("master\n"))],
        &[("a.txt", Some("2\n"))],
    );

    let outcome = sandbox.repository.merge("topic").unwrap();

    assert_eq!(outcome, MergeOutcome::Merged { conflicts: false });
    assert_eq!(sandbox.read("a.txt").as_deref(), Some("2\n"));
}

#[rstest]
fn a_branch_that_is_behind_is_fast_forwarded(mut sandbox: Sandbox) {
    sandbox.commit_file("a.txt", "1\n", "base");
    sandbox.repository.create_branch("topic").unwrap();
    sandbox.repository.checkout_branch("topic").unwrap();
    sandbox.commit_file("a.txt", "2\n", "topic edit");
    let topic_head = sandbox.commit_file("b.txt", "b\n", "topic add");
    sandbox.repository.checkout_branch("master").unwrap();

    let outcome = sandbox.repository.merge("topic").unwrap();

    assert_eq!(outcome, MergeOutcome::FastForward);
    assert_eq!(outcome.to_string(), "Current branch fast-forwarded.");
    assert_eq!(sandbox.repository.head_oid().unwrap(), topic_head);
    assert_eq!(sandbox.read("a.txt").as_deref(), Some("2\n"));
    assert_eq!(sandbox.read("b.txt").as_deref(), Some("b\n"));
    assert!(sandbox.repository.current_branch().unwrap().has_tracked("b.txt"));
}

#[rstest]
fn merging_an_ancestor_changes_nothing(mut sandbox: Sandbox) {
    sandbox.commit_file("a.txt", "1\n", "base");
    sandbox.repository.create_branch("old").unwrap();
    let head = sandbox.commit_file("a.txt", "2\n", "newer");

    let outcome = sandbox.repository.merge("old").unwrap();

    assert_eq!(outcome, MergeOutcome::AlreadyMerged);
    assert_eq!(
        outcome.to_string(),
        "Given branch is an ancestor of the current branch."
    );
    assert_eq!(sandbox.repository.head_oid().unwrap(), head);
    assert_eq!(sandbox.read("a.txt").as_deref(), Some("2\n"));
}

#[rstest]
fn merge_preconditions_are_checked_in_order(mut sandbox: Sandbox) {
    sandbox.commit_file("a.txt", "1\n", "base");
    sandbox.repository.create_branch("topic").unwrap();

    assert_eq!(
        repository_error(sandbox.repository.merge("ghost")),
        RepositoryError::BranchNotFound("ghost".into())
    );
    assert_eq!(
        repository_error(sandbox.repository.merge("master")),
        RepositoryError::MergeWithSelf
    );

    sandbox.write("a.txt", "pending\n");
    sandbox.repository.add("a.txt").unwrap();
    assert_eq!(
        repository_error(sandbox.repository.merge("master")),
        RepositoryError::UncommittedChanges
    );
}

#[rstest]
fn an_untracked_file_in_the_way_aborts_the_whole_merge(mut sandbox: Sandbox) {
    diverge(
        &mut sandbox,
        &[("b.txt", Some("master\n"))],
        &[("a.txt", Some("2\n")), ("c.txt", Some("topic\n"))],
    );
    let head = sandbox.repository.head_oid().unwrap();
    sandbox.write("c.txt", "mine\n");
    sandbox.repository.update_untracked().unwrap();

    assert_eq!(
        repository_error(sandbox.repository.merge("topic")),
        RepositoryError::UntrackedFileInTheWay("c.txt".into())
    );
    assert_eq!(sandbox.repository.head_oid().unwrap(), head);
    assert_eq!(sandbox.read("a.txt").as_deref(), Some("1\n"));
    assert_eq!(sandbox.read("c.txt").as_deref(), Some("mine\n"));
    assert!(sandbox.repository.stage().is_empty());
}

#[rstest]
fn a_second_merge_uses_the_previous_merge_as_its_base(mut sandbox: Sandbox) {
    diverge(
        &mut sandbox,
        &[("b.txt", Some("master\n"))],
        &[("a.txt", Some("2\n"))],
    );
    sandbox.repository.merge("topic").unwrap();

    // topic keeps editing the file it already shared with master
    sandbox.repository.checkout_branch("topic").unwrap();
    sandbox.commit_file("a.txt", "2\nmore\n", "topic follow-up");
    sandbox.repository.checkout_branch("master").unwrap();
    sandbox.commit_file("d.txt", "d\n", "master follow-up");

    let outcome = sandbox.repository.merge("topic").unwrap();

    assert_eq!(outcome, MergeOutcome::Merged { conflicts: false });
    assert_eq!(sandbox.read("a.txt").as_deref(), Some("2\nmore\n"));
}

#[rstest]
fn criss_cross_histories_merge_from_one_best_ancestor(mut sandbox: Sandbox) {
    diverge(
        &mut sandbox,
        &[("m.txt", Some("m\n"))],
        &[("t.txt", Some("t\n"))],
    );
    let master_before = sandbox.repository.head_oid().unwrap();
    let topic_before = sandbox.repository.find_branch("topic").unwrap().head().clone();

    // each side merges the other's old head
    sandbox.repository.create_branch("master-snapshot").unwrap();
    sandbox.repository.merge("topic").unwrap();
    sandbox.repository.checkout_branch("topic").unwrap();
    sandbox.repository.merge("master-snapshot").unwrap();
    assert_eq!(
        sandbox.repository.head_commit().unwrap().parent(),
        Some(&topic_before)
    );

    sandbox.commit_file("t.txt", "t2\n", "topic again");
    let topic_head = sandbox.repository.head_oid().unwrap();
    sandbox.repository.checkout_branch("master").unwrap();
    let master_head = sandbox.commit_file("m.txt", "m2\n", "master again");

    let split_point = sandbox
        .repository
        .split_point(&master_head, &topic_head)
        .unwrap()
        .unwrap();
    assert_eq!(split_point, master_before.clone().min(topic_before.clone()));
    assert_eq!(
        sandbox
            .repository
            .split_point(&topic_head, &master_head)
            .unwrap(),
        Some(split_point)
    );

    let outcome = sandbox.repository.merge("topic").unwrap();

    assert!(matches!(outcome, MergeOutcome::Merged { .. }));
    let merge_commit = sandbox.repository.head_commit().unwrap();
    assert_eq!(merge_commit.parent(), Some(&master_head));
    assert_eq!(merge_commit.merge_parent(), Some(&topic_head));
}
