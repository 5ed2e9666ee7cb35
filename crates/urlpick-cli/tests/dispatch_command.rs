use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

#[allow(deprecated)]
fn get_urlpick_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("urlpick")
}

/// Copy the dispatcher into `dir` so its sibling lookup sees only what the
/// test placed there
fn isolate_dispatcher(dir: &std::path::Path) -> PathBuf {
    let source = get_urlpick_bin();
    let isolated = dir.join(source.file_name().unwrap());
    std::fs::copy(&source, &isolated).unwrap();
    isolated
}

#[test]
fn test_help_describes_dispatch() {
    let mut cmd = Command::new(get_urlpick_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("background service"))
        .stdout(predicate::str::contains("--socket"));
}

#[test]
fn test_without_url_exits_quietly() {
    let mut cmd = Command::new(get_urlpick_bin());
    cmd.env("URLPICK_LOG", "info");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("nothing to dispatch"));
}

#[test]
fn test_missing_service_binary_reports_failure() {
    // A copy of the dispatcher in an empty directory has no service binary
    // beside it and nothing listening on the socket it is given.
    let dir = tempfile::tempdir().unwrap();
    let isolated = isolate_dispatcher(dir.path());

    let mut cmd = Command::new(&isolated);
    cmd.arg("--socket")
        .arg(dir.path().join("urlpick.sock"))
        .arg("https://example.com")
        .env("URLPICK_LOG", "info")
        .timeout(Duration::from_secs(10));

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Could not deliver"));
}

/// The normative delivery contract: the URL arrives at the service socket
/// as exactly one newline-terminated line, nothing else.
#[cfg(unix)]
#[test]
fn test_url_arrives_as_one_newline_terminated_line() {
    use std::io::Read;
    use std::os::unix::fs::PermissionsExt;
    use std::os::unix::net::UnixListener;
    use std::sync::mpsc;

    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("urlpick.sock");
    let listener = UnixListener::bind(&socket).unwrap();
    let (line_tx, line_rx) = mpsc::channel();

    let accept_thread = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
        let mut payload = String::new();
        stream.read_to_string(&mut payload).unwrap();
        line_tx.send(payload).unwrap();
    });

    // An isolated dispatcher with an inert service stub beside it: whether
    // or not it decides to start the service, the only connection the
    // listener sees is the delivery itself.
    let isolated = isolate_dispatcher(dir.path());
    let stub = dir.path().join("urlpickd");
    std::fs::write(&stub, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut cmd = Command::new(&isolated);
    cmd.arg("--socket")
        .arg(&socket)
        .arg("https://example.com")
        .env("URLPICK_LOG", "info")
        .timeout(Duration::from_secs(10));
    cmd.assert().success();

    let payload = line_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(payload, "https://example.com\n");
    accept_thread.join().unwrap();
}
