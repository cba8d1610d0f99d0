use serde::{Deserialize, Serialize};

/// Request payload for /api/embed.
#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
}

/// Response payload for /api/embed.
#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
}
