use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Rejection body returned by every failed request:
/// `{ "success": false, "statusCode": <int>, "message": <string> }`.
#[derive(Serialize, Deserialize, Debug)]
pub struct Rejection {
    pub success: bool,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
}

impl Rejection {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self { success: false, status_code, message: message.into() }
    }
}
