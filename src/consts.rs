//! Project-wide constants: service endpoints, environment variable names,
//! and polling defaults.

use std::time::Duration;

/// Public Todoist REST API base. Overridable via [`ENV_TODO_REST_URL`].
pub const DEFAULT_TODO_REST_URL: &str = "https://api.todoist.com/rest/v2";

/// Public Todoist sync API base. Overridable via [`ENV_TODO_SYNC_URL`].
pub const DEFAULT_TODO_SYNC_URL: &str = "https://api.todoist.com/sync/v9";

/// Bearer token for the to-do service.
pub const ENV_TODO_TOKEN: &str = "TODOIST_API_TOKEN";
pub const ENV_TODO_REST_URL: &str = "TODOIST_REST_URL";
pub const ENV_TODO_SYNC_URL: &str = "TODOIST_SYNC_URL";

/// Bearer token for the automation platform.
pub const ENV_JOBS_TOKEN: &str = "AAP_TOKEN";
/// Base URL of the automation platform controller API (no public default —
/// controllers are private deployments).
pub const ENV_JOBS_URL: &str = "AAP_URL";
/// Job template that gathers ACL data from the device under test.
pub const ENV_ACL_TEMPLATE_ID: &str = "AAP_ACL_TEMPLATE_ID";
/// Set to `1`/`true` to skip TLS certificate verification for the
/// automation platform (self-signed controller certs). Verification is on
/// by default.
pub const ENV_JOBS_INSECURE_TLS: &str = "AAP_INSECURE_TLS";

/// Template id used when [`ENV_ACL_TEMPLATE_ID`] is not set.
pub const DEFAULT_ACL_TEMPLATE_ID: u64 = 39;

/// Artifact key the ACL audit template publishes its result under.
pub const ACL_ARTIFACT_KEY: &str = "acl_data";

/// Fixed wait between job status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Poll attempts before giving up on a job that never reaches a terminal
/// status. 100 attempts at the default interval is five minutes.
pub const DEFAULT_MAX_POLLS: u32 = 100;

/// How many days back the completed-task report looks by default.
pub const DEFAULT_COMPLETED_WINDOW_DAYS: i64 = 6;
