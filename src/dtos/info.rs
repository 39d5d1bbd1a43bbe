use serde::{Deserialize, Serialize};

/// Body of `GET /internal/info`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
}
