/// Average vehicle speed used for drive time estimates.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 60.0;

/// Handling minutes per complexity tier.
pub const DEFAULT_HANDLING_MINUTES_PER_COMPLEXITY: u32 = 20;

/// Tier assumed for stops that do not declare one.
pub const DEFAULT_COMPLEXITY: u32 = 1;

pub const DEFAULT_HERE_ROUTING_URL: &str = "https://router.hereapi.com/v8/routes";

/// HERE `transportMode` for routed legs.
pub const DEFAULT_HERE_TRANSPORT_MODE: &str = "car";

pub const DEFAULT_ROUTING_TIMEOUT_SECONDS: u64 = 10;

pub const DEFAULT_ROUTING_MAX_RETRIES: u32 = 2;
