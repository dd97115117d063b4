use thiserror::Error;

/// Which network stage an error came from. A key may authenticate for one
/// stage and fail for the other, so every error carries its stage and the
/// user-facing wording differs between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocode,
    Weather,
}

/// Default cap on how much of an error response body is kept for display.
pub const DEFAULT_BODY_PREVIEW: usize = 200;

/// Failure of a single round trip to the weather provider.
///
/// "Zero geocoding matches" is not an error; `resolve` reports it as
/// `Ok(None)`. The `Display` output of each variant is exactly the notice
/// body shown to the user (the pipeline prefixes "Error: ").
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider rejected the API key (HTTP 401).
    #[error("{}", auth_message(.0))]
    Auth(Stage),

    /// Any other non-success response; `body` is already truncated to the
    /// preview limit.
    #[error("{} failed ({}){}", request_label(.stage), .status, body_suffix(.body))]
    Request { stage: Stage, status: u16, body: String },

    /// The request never produced an HTTP response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON shape the provider documents.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Build a `Request` error, truncating the body to `limit` characters.
    pub fn request(stage: Stage, status: u16, body: &str, limit: usize) -> Self {
        FetchError::Request { stage, status, body: truncate_body(body, limit) }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            FetchError::Auth(stage) | FetchError::Request { stage, .. } => Some(*stage),
            FetchError::Transport(_) | FetchError::Decode(_) => None,
        }
    }
}

fn auth_message(stage: &Stage) -> &'static str {
    match stage {
        Stage::Geocode => "Invalid API key (401). Check your OpenWeatherMap key.",
        Stage::Weather => "Invalid API key (401) when fetching weather.",
    }
}

fn request_label(stage: &Stage) -> &'static str {
    match stage {
        Stage::Geocode => "Geocoding",
        Stage::Weather => "Weather fetch",
    }
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() { String::new() } else { format!(" - {body}") }
}

/// Keep at most `limit` characters of `body`. Counts characters, not bytes,
/// so a multibyte code point is never split.
pub fn truncate_body(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
