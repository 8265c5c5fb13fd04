use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Inbound story request, not yet validated
#[derive(Deserialize, Clone, Debug)]
pub struct StoryRequest {
    pub genre: String,
    pub runtime: i64,
    pub character_count: i64,
}

// Outbound story response
#[derive(Serialize, Clone, Debug)]
pub struct StoryResponse {
    pub storyline: String,
    pub generated_at: DateTime<Utc>,
    pub cache_hit: bool,
}

// Health probe body
#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub cache_size: usize,
}

#[derive(Serialize, Debug)]
pub struct CacheClearResponse {
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct CacheStatsResponse {
    pub total_entries: usize,
    pub cache_ttl_seconds: u64,
    pub memory_usage_mb: f64,
}

// Structured error body; `field` is set for validation failures
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
