use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub(crate) struct PageQuery {
    #[serde(default)]
    pub(crate) page: Option<String>,
    #[serde(default)]
    pub(crate) per_page: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct MemberRequest {
    pub(crate) user_id: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct StatusResponse {
    pub(crate) status: &'static str,
}

impl StatusResponse {
    pub(crate) const fn ok() -> Self {
        Self { status: "OK" }
    }
}
