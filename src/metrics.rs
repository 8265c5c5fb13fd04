use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("plotpop_requests_total", "Total number of story requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("plotpop_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("plotpop_cache_misses_total", "Total cache misses").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "plotpop_request_latency_seconds",
        "Story request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("plotpop_cache_size", "Current number of cached storylines").unwrap();
}
