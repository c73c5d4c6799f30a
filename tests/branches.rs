use common::repository::{Sandbox, repository_error, sandbox};
use pretty_assertions::assert_eq;
use rstest::rstest;
use twig::artifacts::core::errors::RepositoryError;

mod common;

fn branch_names(sandbox: &Sandbox) -> Vec<String> {
    sandbox
        .repository
        .branches()
        .map(|branch| branch.name().to_string())
        .collect()
}

#[rstest]
fn new_branches_start_at_the_current_head(mut sandbox: Sandbox) {
    let head = sandbox.commit_file("wug.txt", "hello\n", "add wug");

    sandbox.repository.create_branch("topic").unwrap();

    let topic = sandbox.repository.find_branch("topic").unwrap();
    assert_eq!(topic.head(), &head);
    assert!(topic.has_tracked("wug.txt"));
    assert_eq!(sandbox.repository.current_branch_name().as_ref(), "master");
    assert_eq!(branch_names(&sandbox), vec!["master", "topic"]);
}

#[rstest]
fn branch_names_must_be_unique(mut sandbox: Sandbox) {
    sandbox.repository.create_branch("topic").unwrap();

    assert_eq!(
        repository_error(sandbox.repository.create_branch("topic")),
        RepositoryError::BranchAlreadyExists("topic".into())
    );
}

#[rstest]
#[case("..")]
#[case("bad..name")]
#[case("topic.lock")]
#[case("with space")]
fn invalid_branch_names_are_rejected(mut sandbox: Sandbox, #[case] name: &str) {
    assert!(matches!(
        repository_error(sandbox.repository.create_branch(name)),
        RepositoryError::InvalidBranchName(_)
    ));
}

#[rstest]
fn removing_a_branch_keeps_its_commits(mut sandbox: Sandbox) {
    sandbox.repository.create_branch("topic").unwrap();
    sandbox.repository.checkout_branch("topic").unwrap();
    let topic_head = sandbox.commit_file("wug.txt", "hello\n", "topic work");
    sandbox.repository.checkout_branch("master").unwrap();

    sandbox.repository.remove_branch("topic").unwrap();

    assert_eq!(branch_names(&sandbox), vec!["master"]);
    assert!(sandbox.repository.database().contains(&topic_head));
    assert!(!sandbox.root().join(".twig/refs/heads/topic").exists());
}

#[rstest]
fn the_current_branch_cannot_be_removed(mut sandbox: Sandbox) {
    assert_eq!(
        repository_error(sandbox.repository.remove_branch("master")),
        RepositoryError::CannotRemoveCurrentBranch("master".into())
    );
}

#[rstest]
fn removing_an_unknown_branch_fails(mut sandbox: Sandbox) {
    assert_eq!(
        repository_error(sandbox.repository.remove_branch("ghost")),
        RepositoryError::BranchNotFound("ghost".into())
    );
}

#[rstest]
fn branches_survive_reopening_the_store(mut sandbox: Sandbox) {
    sandbox.repository.create_branch("feature/login").unwrap();
    sandbox.repository.checkout_branch("feature/login").unwrap();

    sandbox.reopen();

    assert_eq!(
        sandbox.repository.current_branch_name().as_ref(),
        "feature/login"
    );
    assert_eq!(branch_names(&sandbox), vec!["feature/login", "master"]);
}

#[rstest]
fn reset_restores_an_older_snapshot(mut sandbox: Sandbox) {
    let first = sandbox.commit_file("a.txt", "a1\n", "first");
    sandbox.commit_file("b.txt", "b\n", "second");
    sandbox.commit_file("a.txt", "a2\n", "third");
    sandbox.write("scratch.txt", "untracked\n");
    sandbox.repository.update_untracked().unwrap();

    let reset_to = sandbox.repository.reset(&first.as_ref()[..10]).unwrap();

    assert_eq!(reset_to, first);
    assert_eq!(sandbox.repository.head_oid().unwrap(), first);
    assert_eq!(sandbox.read("a.txt").as_deref(), Some("a1\n"));
    assert_eq!(sandbox.read("b.txt"), None);
    assert_eq!(sandbox.read("scratch.txt").as_deref(), Some("untracked\n"));
    assert_eq!(
        sandbox.repository.log().unwrap().len(),
        2,
        "first commit and the root commit"
    );
}

#[rstest]
fn reset_can_jump_to_another_branch_history(mut sandbox: Sandbox) {
    sandbox.repository.create_branch("topic").unwrap();
    sandbox.repository.checkout_branch("topic").unwrap();
    let topic_head = sandbox.commit_file("topic.txt", "t\n", "topic work");
    sandbox.repository.checkout_branch("master").unwrap();
    sandbox.commit_file("master.txt", "m\n", "master work");

    sandbox.repository.reset(topic_head.as_ref()).unwrap();

    assert_eq!(sandbox.repository.current_branch_name().as_ref(), "master");
    assert_eq!(sandbox.repository.head_oid().unwrap(), topic_head);
    assert_eq!(sandbox.read("topic.txt").as_deref(), Some("t\n"));
    assert_eq!(sandbox.read("master.txt"), None);
}

#[rstest]
fn reset_to_an_unknown_commit_changes_nothing(mut sandbox: Sandbox) {
    let head = sandbox.commit_file("a.txt", "a\n", "first");

    assert_eq!(
        repository_error(sandbox.repository.reset("zzzz")),
        RepositoryError::CommitNotFound("zzzz".into())
    );
    assert_eq!(sandbox.repository.head_oid().unwrap(), head);
}
