use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorDto {
    pub error: String,
}

/// Body of stub endpoints that only acknowledge a request.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct StatusDto {
    pub status: String,
}

impl StatusDto {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}
