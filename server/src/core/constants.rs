// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Vitrina";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "vitrina";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".vitrina";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "vitrina.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "VITRINA_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "VITRINA_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "VITRINA_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "VITRINA_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "VITRINA_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

/// API route prefix
pub const API_PREFIX: &str = "/api/v1";

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "VITRINA_DATA_DIR";

/// Environment variable to override the SQLite database file
pub const ENV_DB_PATH: &str = "VITRINA_DB_PATH";

// =============================================================================
// Secrets
// =============================================================================

/// Secrets file inside the data directory
pub const SECRETS_FILE_NAME: &str = "secrets.json";

/// Secret key name for the session signing key
pub const SECRET_KEY_JWT_SIGNING: &str = "jwt_signing_key";

// =============================================================================
// Auth
// =============================================================================

/// Environment variable to disable admin authentication
pub const ENV_NO_AUTH: &str = "VITRINA_NO_AUTH";

/// Environment variable for a fixed bootstrap token
pub const ENV_BOOTSTRAP_TOKEN: &str = "VITRINA_BOOTSTRAP_TOKEN";

/// Environment variable for admin session lifetime
pub const ENV_SESSION_TTL_HOURS: &str = "VITRINA_SESSION_TTL_HOURS";

/// Admin session lifetime in hours
pub const DEFAULT_SESSION_TTL_HOURS: u32 = 12;

/// Bootstrap token length in random bytes (hex encoded on output)
pub const BOOTSTRAP_TOKEN_BYTES: usize = 24;

/// JWT issuer claim
pub const JWT_ISSUER: &str = "vitrina";

/// Auth method recorded in session claims
pub const AUTH_METHOD_BOOTSTRAP: &str = "bootstrap";

/// Auth method for sessions injected when auth is disabled
pub const AUTH_METHOD_DISABLED: &str = "disabled";

/// Subject of every admin session (single operator)
pub const ADMIN_SUBJECT: &str = "admin";

// =============================================================================
// SQLite
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "vitrina.db";

/// Default pool size
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// Busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// Page cache size (negative = KiB)
pub const SQLITE_CACHE_SIZE: &str = "-16000";

/// Pages between automatic WAL checkpoints
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval for the passive WAL checkpoint task
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// HTTP
// =============================================================================

/// Default request body limit (1 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for auth endpoints
pub const AUTH_BODY_LIMIT: usize = 16 * 1024;

/// Grace period for in-flight work on shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Pagination
// =============================================================================

/// Default page size for admin listing pages
pub const DEFAULT_ADMIN_PAGE_LIMIT: u32 = 50;

/// Largest admin page size
pub const MAX_ADMIN_PAGE_LIMIT: u32 = 200;

// =============================================================================
// Directory
// =============================================================================

/// Longest city slug; the `cities` table CHECK uses the same bound
pub const MAX_SLUG_LEN: usize = 50;

// =============================================================================
// Cache
// =============================================================================

/// Environment variable for cache capacity
pub const ENV_CACHE_MAX_ENTRIES: &str = "VITRINA_CACHE_MAX_ENTRIES";

/// Environment variable for the default cache TTL
pub const ENV_CACHE_TTL_SECS: &str = "VITRINA_CACHE_TTL_SECS";

/// Default cache capacity
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;

/// Default cache TTL in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Prefix for every cache key; bump when cached shapes change
pub const CACHE_KEY_VERSION: &str = "v1";

/// City list TTL in seconds
pub const CACHE_TTL_CITY_LIST: u64 = 600;

/// District list TTL in seconds
pub const CACHE_TTL_DISTRICTS: u64 = 600;
