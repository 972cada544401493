/// Pulse pipeline version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of queued records that triggers a flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 5;

/// Maximum number of pending entries kept in the durable retry store.
pub const DEFAULT_STORE_CAPACITY: usize = 20;

/// Delay before the one-shot environment collection (seconds).
pub const DEFAULT_ENVIRONMENT_DELAY_SECS: u64 = 2;

/// Interval between activity collections while visible (seconds).
pub const DEFAULT_ACTIVITY_INTERVAL_SECS: u64 = 30;

/// Delay between a persist event and its scheduled retry pass (seconds).
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 60;

/// Spacing between sequential retry attempts (milliseconds).
pub const DEFAULT_RETRY_SPACING_MS: u64 = 1000;

/// Delay between visibility-regain and the immediate activity collection
/// (milliseconds).
pub const DEFAULT_VISIBILITY_RESUME_DELAY_MS: u64 = 1000;

/// Per-request timeout applied to both transports (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Hard cap on the encoded `data` field of the primary envelope.
pub const MAX_ENCODED_PAYLOAD_CHARS: usize = 3000;

/// Length of the device fingerprint token.
pub const DEVICE_TOKEN_LEN: usize = 20;

/// Agent string length used in the device fingerprint.
pub const FINGERPRINT_AGENT_LEN: usize = 40;

/// Agent string length reported in environment records.
pub const RECORD_AGENT_LEN: usize = 80;

/// Session identifier prefix.
pub const SESSION_ID_PREFIX: &str = "SESS_";

/// State-store key holding the device identity token.
pub const DEVICE_ID_KEY: &str = "device_id_v3";

/// State-store key holding the durable retry log.
pub const PENDING_KEY: &str = "pending_data";

/// Header identifying the collection service on the primary channel.
pub const SERVICE_HEADER: &str = "X-Service-Key";
pub const SERVICE_HEADER_VALUE: &str = "data-collection-v1";
