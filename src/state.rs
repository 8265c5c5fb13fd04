use std::time::Instant;

use crate::service::StoryService;

// App's shared state
pub struct AppState {
    pub service: StoryService,
    pub started_at: Instant,
}
