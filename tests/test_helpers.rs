#![allow(dead_code)]

use assert_cmd::Command;
use std::net::TcpListener;
use std::path::Path;

/// Creates a `Command` for the `reverie` binary with a clean environment
/// pointed at `db_path`. Additional environment variables or arguments can
/// be configured by the caller.
pub fn base_reverie_command(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("reverie").expect("reverie binary not built");
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    cmd.env("HOME", "/tmp")
        .env("REVERIE_DB", db_path)
        .env("RUST_LOG", "off");
    cmd
}

/// Returns a URL on a local port that nothing listens on.
pub fn dead_endpoint(route: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, route)
}
