//! Lifecycle tests for the dev-server guard

use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use helio_testing::{ServerConfig, ServerGuard, TestingError};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn local_config(port: u16) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: port.to_string(),
        ..ServerConfig::default()
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[test]
fn guard_does_not_adopt_an_external_server() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut guard = ServerGuard::new(local_config(port));
    guard.start().unwrap();
    assert!(!guard.owns_process());

    // stop must not signal anything; the external listener stays reachable
    guard.stop();
    assert!(TcpStream::connect(("127.0.0.1", port)).is_ok());
}

#[test]
fn double_start_against_an_external_server_stays_unowned() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut guard = ServerGuard::new(local_config(port));
    guard.start().unwrap();
    guard.start().unwrap();
    assert!(!guard.owns_process());
}

#[test]
fn spawn_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    let mut config = local_config(free_port());
    config.base_path = dir.path().to_path_buf();
    config.entrypoint = "no-such-entrypoint".into();

    let mut guard = ServerGuard::new(config);
    let err = guard.start().unwrap_err();
    assert!(matches!(err, TestingError::ServerStartup(_)));
    assert!(!guard.owns_process());
}

#[cfg(unix)]
#[test]
fn guard_spawns_and_terminates_its_own_server() {
    use std::os::unix::fs::PermissionsExt;

    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let entrypoint = dir.path().join("helio");
    std::fs::write(
        &entrypoint,
        "#!/bin/sh\n[ \"$1\" = serve ] || exit 64\nexec sleep 30\n",
    )
    .unwrap();
    std::fs::set_permissions(&entrypoint, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut config = local_config(free_port());
    config.base_path = dir.path().to_path_buf();
    config.entrypoint = "helio".into();

    let mut guard = ServerGuard::new(config);
    guard.start().unwrap();
    assert!(guard.owns_process());

    // a second start must not launch another process
    guard.start().unwrap();
    assert!(guard.owns_process());

    guard.stop();
    assert!(!guard.owns_process());
}

#[test]
fn suite_hooks_wrap_the_shared_guard() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    helio_testing::suite::before_first_test(local_config(port)).unwrap();
    // a repeated runner hook is tolerated
    helio_testing::suite::before_first_test(local_config(port)).unwrap();
    helio_testing::suite::after_last_test();

    // the guard deferred to the external listener, so it is still reachable
    assert!(TcpStream::connect(("127.0.0.1", port)).is_ok());

    // teardown without an installed guard is a no-op
    helio_testing::suite::after_last_test();
}

#[test]
fn wait_until_running_observes_a_late_listener() {
    let port = free_port();
    let guard = ServerGuard::new(local_config(port));

    let binder = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        TcpListener::bind(("127.0.0.1", port)).unwrap()
    });

    assert!(guard.wait_until_running(Duration::from_secs(5)));
    drop(binder.join().unwrap());
}
