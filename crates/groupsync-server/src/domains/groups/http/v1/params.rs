use std::collections::HashMap;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use groupsync_core::GroupSyncableType;

use super::types::PageQuery;
use crate::domains::errors::ApiError;

pub(crate) const ID_MAX_LENGTH: usize = 64;
pub(crate) const DEFAULT_PER_PAGE: u32 = 60;
pub(crate) const MAX_PER_PAGE: u32 = 200;

pub(crate) fn is_valid_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= ID_MAX_LENGTH
        && value.bytes().all(|byte| byte.is_ascii_alphanumeric())
}

/// Raw path segments of the matched route. A path that failed to decode
/// behaves as if every parameter were absent.
#[derive(Debug, Default)]
pub(crate) struct PathParams(HashMap<String, String>);

impl From<Result<Path<HashMap<String, String>>, PathRejection>> for PathParams {
    fn from(result: Result<Path<HashMap<String, String>>, PathRejection>) -> Self {
        match result {
            Ok(Path(values)) => Self(values),
            Err(err) => {
                tracing::debug!(event = "path_params_rejected", error = %err);
                Self::default()
            }
        }
    }
}

impl PathParams {
    pub(crate) fn require_id(&self, name: &str) -> Result<String, ApiError> {
        match self.0.get(name) {
            Some(value) if is_valid_id(value) => Ok(value.clone()),
            _ => Err(ApiError::invalid_parameter(name)),
        }
    }

    pub(crate) fn require_group_id(&self) -> Result<String, ApiError> {
        self.require_id("group_id")
    }

    pub(crate) fn require_user_id(&self) -> Result<String, ApiError> {
        self.require_id("user_id")
    }

    /// Reads `team_id` or `channel_id` depending on the syncable type.
    pub(crate) fn require_syncable_id(
        &self,
        syncable_type: GroupSyncableType,
    ) -> Result<String, ApiError> {
        self.require_id(syncable_type.param_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Page {
    pub(crate) page: u32,
    pub(crate) per_page: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Page {
    pub(crate) fn from_query(
        query: Result<Query<PageQuery>, QueryRejection>,
    ) -> Result<Self, ApiError> {
        let Query(query) = query.map_err(|_| ApiError::invalid_parameter("page"))?;
        let page = parse_number(query.page.as_deref(), "page")?.unwrap_or(0);
        let per_page = parse_number(query.per_page.as_deref(), "per_page")?
            .unwrap_or(DEFAULT_PER_PAGE)
            .min(MAX_PER_PAGE);
        Ok(Self { page, per_page })
    }
}

fn parse_number(value: Option<&str>, name: &str) -> Result<Option<u32>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ApiError::invalid_parameter(name)),
    }
}
