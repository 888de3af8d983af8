use assert_cmd::Command;
use predicates::prelude::*;

fn jubilee(data_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("jubilee").unwrap();
    cmd.arg("--data-dir").arg(data_dir);
    // Keep the smoke test hermetic even if the host has a backend configured.
    cmd.env_remove("JUBILEE_REMOTE_URL")
        .env_remove("JUBILEE_REMOTE_KEY")
        .env_remove("JUBILEE_EMAIL_SERVICE_ID");
    cmd
}

#[test]
fn post_then_list_shows_the_post() {
    let dir = tempfile::tempdir().unwrap();

    jubilee(dir.path())
        .args(["post", "Party prep", "Balloons acquired."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Party prep"));

    jubilee(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Party prep").and(predicate::str::contains("Anonymous")));
}

#[test]
fn blank_title_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    jubilee(dir.path())
        .args(["post", "   ", "body"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title cannot be empty"));
}

#[test]
fn comment_and_like_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    jubilee(dir.path())
        .args(["post", "Party prep", "Balloons acquired."])
        .assert()
        .success();

    jubilee(dir.path())
        .args(["comment", "1", "Streamers too!", "--author", "Bo"])
        .assert()
        .success();

    jubilee(dir.path()).args(["like", "1"]).assert().success();

    jubilee(dir.path())
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Streamers too!")
                .and(predicate::str::contains("by Bo"))
                .and(predicate::str::contains("♥ 1")),
        );
}

#[test]
fn quote_and_countdown_always_work() {
    let dir = tempfile::tempdir().unwrap();

    jubilee(dir.path())
        .arg("quote")
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());

    jubilee(dir.path())
        .arg("countdown")
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}
