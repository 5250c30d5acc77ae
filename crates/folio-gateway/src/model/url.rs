use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateShortUrlRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortUrlResponse {
    pub short_url: String,
    pub original_url: String,
}
