//! Mock portal start-up for tests that need a loopback socket.
//!
//! Sandboxed runners sometimes forbid binding `127.0.0.1`. Those tests are
//! skipped there unless `MTSCRAPE_REQUIRE_SOCKET_TESTS` asks for a hard failure.

use std::net::TcpListener;

use wiremock::MockServer;

const REQUIRE_SOCKETS_ENV: &str = "MTSCRAPE_REQUIRE_SOCKET_TESTS";

fn env_flag_enabled(value: &str) -> bool {
    ["1", "true", "yes"]
        .iter()
        .any(|enabled| value.trim().eq_ignore_ascii_case(enabled))
}

fn sockets_required() -> bool {
    std::env::var(REQUIRE_SOCKETS_ENV).is_ok_and(|value| env_flag_enabled(&value))
}

/// Starts a mock portal, or returns `None` when loopback sockets are unavailable.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    match TcpListener::bind("127.0.0.1:0") {
        Ok(_) => Some(MockServer::start().await),
        Err(error) if sockets_required() => {
            panic!("cannot bind a loopback socket ({error}) and {REQUIRE_SOCKETS_ENV} is set")
        }
        Err(error) => {
            eprintln!(
                "skipping mock portal test: cannot bind a loopback socket ({error}); \
                 set {REQUIRE_SOCKETS_ENV}=1 to fail instead"
            );
            None
        }
    }
}

#[test]
fn test_env_flag_values() {
    assert!(env_flag_enabled("1"));
    assert!(env_flag_enabled("TRUE"));
    assert!(env_flag_enabled(" yes "));
    assert!(!env_flag_enabled("0"));
    assert!(!env_flag_enabled(""));
}
