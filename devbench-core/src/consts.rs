//! Constants for devbench
//!
//! Defaults for every installer option plus the fixed service endpoints and
//! executables the generated commands refer to.

use std::time::Duration;

/// Default path to the apps manifest handed to `bench init`
pub const DEFAULT_APPS_JSON: &str = "apps-example.json";

/// Default bench directory name
pub const DEFAULT_BENCH_NAME: &str = "frappe-bench";

/// Default site name
pub const DEFAULT_SITE_NAME: &str = "development.localhost";

/// Default frappe framework repository
pub const DEFAULT_FRAPPE_REPO: &str = "https://github.com/sin-ev/backend";

/// Default frappe framework branch
pub const DEFAULT_FRAPPE_BRANCH: &str = "version-12";

/// Default site administrator password
pub const DEFAULT_ADMIN_PASSWORD: &str = "123";

/// Default database root password used by `bench new-site`
pub const DEFAULT_DB_ROOT_PASSWORD: &str = "123";

/// Redis endpoint written as `redis_cache`
pub const REDIS_CACHE_URL: &str = "redis://redis-cache:6379";

/// Redis endpoint written as `redis_queue` and `redis_socketio`
pub const REDIS_QUEUE_URL: &str = "redis://redis-queue:6379";

/// Service hostname of the MariaDB container
pub const MARIADB_HOST: &str = "mariadb";

/// Service hostname of the PostgreSQL container
pub const POSTGRES_HOST: &str = "postgresql";

/// Name of the framework app, always present under `<bench>/apps`
pub const FRAPPE_APP: &str = "frappe";

/// The bench CLI
pub const BENCH_EXECUTABLE: &str = "bench";

/// Shell used to run `bench init` with the interactive profile loaded
pub const SHELL_EXECUTABLE: &str = "/bin/bash";

/// Platform-specific Git executable name
#[cfg(windows)]
pub const GIT_EXECUTABLE: &str = "git.exe";

/// Platform-specific Git executable name
#[cfg(not(windows))]
pub const GIT_EXECUTABLE: &str = "git";

/// Upper bound for `git ls-remote`
pub const LS_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Marker in `bench init` stderr that usually means the branch is missing
pub const INVALID_REMOTE_MARKER: &str = "InvalidRemoteException";

/// Environment variable selecting the pyenv interpreter
pub const ENV_PYENV_VERSION: &str = "PYENV_VERSION";
