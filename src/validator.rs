use thiserror::Error;

use crate::models::StoryRequest;

pub const ALLOWED_GENRES: [&str; 18] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "Western",
    "Fantasy",
    "Animation",
    "Documentary",
    "Musical",
    "War",
    "Crime",
    "Biography",
    "History",
];

pub const RUNTIME_MIN: i64 = 10;
pub const RUNTIME_MAX: i64 = 240;
pub const CHARACTER_COUNT_MIN: i64 = 1;
pub const CHARACTER_COUNT_MAX: i64 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("genre '{0}' is not in the allowed set: {allowed}", allowed = ALLOWED_GENRES.join(", "))]
    UnknownGenre(String),
    #[error("runtime must be between 10 and 240 minutes, got {0}")]
    RuntimeOutOfRange(i64),
    #[error("character_count must be between 1 and 10, got {0}")]
    CharacterCountOutOfRange(i64),
}

impl ValidationError {
    // Which request field failed
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UnknownGenre(_) => "genre",
            ValidationError::RuntimeOutOfRange(_) => "runtime",
            ValidationError::CharacterCountOutOfRange(_) => "character_count",
        }
    }
}

/// A story request that passed validation. Fields are normalized
/// (genre title-cased) and frozen; the prompt is derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    genre: String,
    runtime: i64,
    character_count: i64,
}

impl ValidatedRequest {
    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn runtime(&self) -> i64 {
        self.runtime
    }

    pub fn character_count(&self) -> i64 {
        self.character_count
    }

    // Canonical prompt template sent upstream
    pub fn prompt(&self) -> String {
        format!(
            "Write a creative {} movie storyline that is suitable for a runtime of {} minutes \
             and involves approximately {} main characters. Make it imaginative, engaging, and \
             suitable for a short film or feature-length production.",
            self.genre, self.runtime, self.character_count
        )
    }
}

// Capitalize each segment, where segments split on spaces and hyphens
// ("sci-fi" -> "Sci-Fi")
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_boundary = true;
    for c in raw.chars() {
        if c == ' ' || c == '-' {
            at_boundary = true;
            out.push(c);
        } else if at_boundary {
            out.extend(c.to_uppercase());
            at_boundary = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Check a raw request against the domain constraints. Pure function,
/// no side effects; the first failing field wins.
pub fn validate(req: &StoryRequest) -> Result<ValidatedRequest, ValidationError> {
    let genre = title_case(req.genre.trim());
    if !ALLOWED_GENRES.contains(&genre.as_str()) {
        return Err(ValidationError::UnknownGenre(genre));
    }
    if !(RUNTIME_MIN..=RUNTIME_MAX).contains(&req.runtime) {
        return Err(ValidationError::RuntimeOutOfRange(req.runtime));
    }
    if !(CHARACTER_COUNT_MIN..=CHARACTER_COUNT_MAX).contains(&req.character_count) {
        return Err(ValidationError::CharacterCountOutOfRange(req.character_count));
    }
    Ok(ValidatedRequest {
        genre,
        runtime: req.runtime,
        character_count: req.character_count,
    })
}
