use thiserror::Error;

/// Failures talking to the property table
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("data service is not configured (set SUPABASE_URL and SUPABASE_ANON_KEY)")]
    NotConfigured,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}
