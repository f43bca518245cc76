#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use groupsync_core::memory::{InMemoryGroupService, ROLE_GROUP_MANAGER, ROLE_SYSTEM_ADMIN};
use groupsync_core::{
    Group, GroupMember, GroupService, GroupSyncable, GroupSyncableType, License, LicenseFeatures,
    Permission, ServiceResult, Session,
};
use groupsync_server::app::{build_router, AppState};
use groupsync_server::config::ServerConfig;
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const MANAGER_TOKEN: &str = "manager-token";
pub const USER_TOKEN: &str = "user-token";

/// Delegates to [`InMemoryGroupService`] and remembers which data
/// operations were invoked.
pub struct RecordingService {
    inner: InMemoryGroupService,
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingService {
    fn record(&self, call: &'static str) {
        self.calls
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    pub fn inner(&self) -> &InMemoryGroupService {
        &self.inner
    }
}

#[async_trait]
impl GroupService for RecordingService {
    fn license(&self) -> Option<License> {
        self.inner.license()
    }

    fn session_has_permission_to(&self, session: &Session, permission: Permission) -> bool {
        self.inner.session_has_permission_to(session, permission)
    }

    async fn session_from_token(&self, token: &str) -> ServiceResult<Session> {
        self.inner.session_from_token(token).await
    }

    async fn create_group(&self, group: Group) -> ServiceResult<Group> {
        self.record("create_group");
        self.inner.create_group(group).await
    }

    async fn get_group(&self, group_id: &str) -> ServiceResult<Group> {
        self.record("get_group");
        self.inner.get_group(group_id).await
    }

    async fn get_groups_page(&self, page: u32, per_page: u32) -> ServiceResult<Vec<Group>> {
        self.record("get_groups_page");
        self.inner.get_groups_page(page, per_page).await
    }

    async fn update_group(&self, group: Group) -> ServiceResult<Group> {
        self.record("update_group");
        self.inner.update_group(group).await
    }

    async fn delete_group(&self, group_id: &str) -> ServiceResult<Group> {
        self.record("delete_group");
        self.inner.delete_group(group_id).await
    }

    async fn create_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ServiceResult<GroupMember> {
        self.record("create_group_member");
        self.inner.create_group_member(group_id, user_id).await
    }

    async fn delete_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ServiceResult<GroupMember> {
        self.record("delete_group_member");
        self.inner.delete_group_member(group_id, user_id).await
    }

    async fn create_group_syncable(
        &self,
        syncable: GroupSyncable,
    ) -> ServiceResult<GroupSyncable> {
        self.record("create_group_syncable");
        self.inner.create_group_syncable(syncable).await
    }

    async fn get_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: GroupSyncableType,
    ) -> ServiceResult<GroupSyncable> {
        self.record("get_group_syncable");
        self.inner
            .get_group_syncable(group_id, syncable_id, syncable_type)
            .await
    }

    async fn get_group_syncables_page(
        &self,
        group_id: &str,
        syncable_type: GroupSyncableType,
        page: u32,
        per_page: u32,
    ) -> ServiceResult<Vec<GroupSyncable>> {
        self.record("get_group_syncables_page");
        self.inner
            .get_group_syncables_page(group_id, syncable_type, page, per_page)
            .await
    }

    async fn update_group_syncable(
        &self,
        syncable: GroupSyncable,
    ) -> ServiceResult<GroupSyncable> {
        self.record("update_group_syncable");
        self.inner.update_group_syncable(syncable).await
    }

    async fn delete_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: GroupSyncableType,
    ) -> ServiceResult<GroupSyncable> {
        self.record("delete_group_syncable");
        self.inner
            .delete_group_syncable(group_id, syncable_id, syncable_type)
            .await
    }
}

pub fn ldap_license() -> License {
    License {
        id: "test-license".to_string(),
        features: LicenseFeatures {
            ldap: true,
            ..LicenseFeatures::default()
        },
        expires_at: None,
    }
}

fn session(id: &str, user_id: &str, roles: &[&str]) -> Session {
    Session {
        id: id.to_string(),
        user_id: user_id.to_string(),
        roles: roles.iter().map(|role| (*role).to_string()).collect(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        if self.body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&self.body).expect("json")
        }
    }
}

pub struct TestApp {
    pub app: axum::Router,
    pub service: Arc<RecordingService>,
}

impl TestApp {
    pub fn licensed() -> Self {
        Self::with_license(Some(ldap_license()), ServerConfig::default())
    }

    pub fn unlicensed() -> Self {
        Self::with_license(None, ServerConfig::default())
    }

    pub fn with_license(license: Option<License>, config: ServerConfig) -> Self {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("groupsync_server=debug"))
                .with_test_writer()
                .try_init();
        });

        let inner = InMemoryGroupService::new()
            .with_license(license)
            .with_session(ADMIN_TOKEN, session("s-admin", "admin", &[ROLE_SYSTEM_ADMIN]))
            .with_session(
                MANAGER_TOKEN,
                session("s-manager", "manager", &[ROLE_GROUP_MANAGER]),
            )
            .with_session(USER_TOKEN, session("s-user", "user", &[]));
        let service = Arc::new(RecordingService {
            inner,
            calls: Mutex::new(Vec::new()),
        });
        let state = AppState::new(service.clone(), config);
        Self {
            app: build_router(state),
            service,
        }
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(text) => {
                builder = builder.header("content-type", "application/json");
                Body::from(text.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request");
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        TestResponse {
            status,
            body: bytes.to_vec(),
        }
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let text = serde_json::to_string(&body).expect("encode json");
        let response = self.send_raw(method, uri, token, Some(&text)).await;
        (response.status, response.json())
    }

    pub async fn get_json(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let response = self.send_raw(Method::GET, uri, token, None).await;
        (response.status, response.json())
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let response = self.send_raw(Method::DELETE, uri, token, None).await;
        (response.status, response.json())
    }

    /// Creates a group as the admin and returns its id.
    pub async fn create_group(&self, name: &str, remote_id: &str) -> String {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/api/v4/groups",
                Some(ADMIN_TOKEN),
                serde_json::json!({
                    "name": name,
                    "display_name": name,
                    "remote_id": remote_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create group: {body}");
        body["id"].as_str().expect("group id").to_string()
    }
}
