//! Environment fixtures shared by the integration tests.
//!
//! Every variable the server reads is cleared before a test body runs, so a
//! developer's shell (or a `.env` loaded elsewhere) cannot leak into results.

use std::env;

use parking_lot::Mutex;

/// Variables read by `AppConfig`, `RepositoryType` and `PostgresConfig`.
pub const GEOGAME_VARS: &[&str] = &[
    "ENV",
    "HOST",
    "PORT",
    "HTTP_TIME_OUT",
    "DB_TIME_OUT",
    "TOKEN_SECRET",
    "secret",
    "TOKEN_TTL_SECS",
    "REPOSITORY_TYPE",
    "DATABASE_URL",
    "PG_DATABASE_URL",
    "PG_HOST",
    "PG_PORT",
    "PG_DB",
    "PG_USER",
    "PG_PASS",
    "PG_POOL_MAX",
    "PG_POOL_MIN",
    "PG_CONN_TIMEOUT_SEC",
    "PG_IDLE_TIMEOUT_SEC",
    "PG_MAX_RETRIES",
    "PG_RETRY_DELAY_MS",
];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with every geogame variable unset except `vars`, which are set.
///
/// Calls are serialised because the process environment is global, and the
/// previous values come back when `f` returns or panics.
pub fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let _lock = ENV_LOCK.lock();
    let _restore = Restore::capture();
    for key in GEOGAME_VARS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }
    f()
}

struct Restore(Vec<(&'static str, Option<String>)>);

impl Restore {
    fn capture() -> Self {
        Self(
            GEOGAME_VARS
                .iter()
                .map(|key| (*key, env::var(key).ok()))
                .collect(),
        )
    }
}

impl Drop for Restore {
    fn drop(&mut self) {
        for (key, value) in &self.0 {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}
