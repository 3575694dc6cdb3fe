//! REST client for the roster API.

use crate::config::TuiConfig;
use crate::credentials::SharedToken;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use roster_core::{
    ApiError, ApiResult, EntryId, EntryInput, EntryListResponse, FieldDefinition, FieldId,
    FieldInput, ListParams, LoginRequest, LoginResponse, Page, PageWindow, Registry,
    RegistryEntry, RegistryId, RegistryInput, RosterApi, TeamMember, TeamMemberId,
    TeamMemberInput, TeamMemberListResponse, UploadResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    token: SharedToken,
}

impl RestClient {
    pub fn new(config: &TuiConfig, token: SharedToken) -> ApiResult<Self> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request with the current bearer token, if any.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request = self.client.request(method, url);
        match self.token.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut request = self.request(Method::GET, path);
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = send(request).await?;
        parse_response(response).await
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = send(self.request(method, path).json(body)).await?;
        parse_response(response).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let response = send(self.request(Method::DELETE, path)).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(server_error(status.as_u16(), &text))
    }
}

async fn send(request: RequestBuilder) -> ApiResult<Response> {
    request.send().await.map_err(classify_send_error)
}

/// Sort a transport failure into "never sent" or "sent, no answer".
pub(crate) fn classify_send_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        ApiError::Request(err.to_string())
    } else if err.is_timeout() {
        ApiError::Network(format!("request timed out: {err}"))
    } else {
        ApiError::Network(err.to_string())
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "server rejected request");
        return Err(server_error(status.as_u16(), &text));
    }
    decode_body(status.as_u16(), &text)
}

/// Build the server-reported error, preferring the body's own message.
pub(crate) fn server_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
            })
        });
    match message {
        Some(message) => ApiError::server(status, message),
        None => ApiError::generic_server(status),
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<T> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::server(status, format!("Malformed response from server: {e}")))
}

#[async_trait]
impl RosterApi for RestClient {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        self.send_json(Method::POST, "/auth/login", credentials).await
    }

    async fn list_team_members(&self, params: &ListParams) -> ApiResult<Page<TeamMember>> {
        let response: TeamMemberListResponse =
            self.get_json("/team-members", Some(params)).await?;
        Ok(Page::new(response.team_members, response.total_pages))
    }

    async fn get_team_member(&self, id: TeamMemberId) -> ApiResult<TeamMember> {
        self.get_json::<_, ()>(&format!("/team-members/{id}"), None)
            .await
    }

    async fn create_team_member(&self, input: &TeamMemberInput) -> ApiResult<TeamMember> {
        self.send_json(Method::POST, "/team-members", input).await
    }

    async fn update_team_member(
        &self,
        id: TeamMemberId,
        input: &TeamMemberInput,
    ) -> ApiResult<TeamMember> {
        self.send_json(Method::PUT, &format!("/team-members/{id}"), input)
            .await
    }

    async fn delete_team_member(&self, id: TeamMemberId) -> ApiResult<()> {
        self.delete(&format!("/team-members/{id}")).await
    }

    async fn list_fields(&self, _params: &ListParams) -> ApiResult<Vec<FieldDefinition>> {
        self.get_json::<_, ()>("/fields", None).await
    }

    async fn get_field(&self, id: FieldId) -> ApiResult<FieldDefinition> {
        self.get_json::<_, ()>(&format!("/fields/{id}"), None).await
    }

    async fn create_field(&self, input: &FieldInput) -> ApiResult<FieldDefinition> {
        self.send_json(Method::POST, "/fields", input).await
    }

    async fn update_field(&self, id: FieldId, input: &FieldInput) -> ApiResult<FieldDefinition> {
        self.send_json(Method::PUT, &format!("/fields/{id}"), input)
            .await
    }

    async fn delete_field(&self, id: FieldId) -> ApiResult<()> {
        self.delete(&format!("/fields/{id}")).await
    }

    async fn list_registries(&self, _params: &ListParams) -> ApiResult<Vec<Registry>> {
        self.get_json::<_, ()>("/registries", None).await
    }

    async fn get_registry(&self, id: RegistryId) -> ApiResult<Registry> {
        self.get_json::<_, ()>(&format!("/registries/{id}"), None)
            .await
    }

    async fn create_registry(&self, input: &RegistryInput) -> ApiResult<Registry> {
        self.send_json(Method::POST, "/registries", input).await
    }

    async fn update_registry(&self, id: RegistryId, input: &RegistryInput) -> ApiResult<Registry> {
        self.send_json(Method::PUT, &format!("/registries/{id}"), input)
            .await
    }

    async fn delete_registry(&self, id: RegistryId) -> ApiResult<()> {
        self.delete(&format!("/registries/{id}")).await
    }

    async fn list_registry_entries(
        &self,
        registry_id: RegistryId,
        window: PageWindow,
    ) -> ApiResult<Page<RegistryEntry>> {
        let path = format!("/registries/{registry_id}/entries");
        let response: EntryListResponse = self.get_json(&path, Some(&window)).await?;
        Ok(Page::new(response.entries, response.total_pages))
    }

    async fn create_registry_entry(
        &self,
        registry_id: RegistryId,
        input: &EntryInput,
    ) -> ApiResult<RegistryEntry> {
        let path = format!("/registries/{registry_id}/entries");
        self.send_json(Method::POST, &path, input).await
    }

    async fn update_registry_entry(
        &self,
        registry_id: RegistryId,
        entry_id: EntryId,
        input: &EntryInput,
    ) -> ApiResult<RegistryEntry> {
        let path = format!("/registries/{registry_id}/entries/{entry_id}");
        self.send_json(Method::PUT, &path, input).await
    }

    async fn delete_registry_entry(
        &self,
        registry_id: RegistryId,
        entry_id: EntryId,
    ) -> ApiResult<()> {
        self.delete(&format!("/registries/{registry_id}/entries/{entry_id}"))
            .await
    }

    /// Upload using multipart/form-data with a single `file` part.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<UploadResponse> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = send(self.request(Method::POST, "/upload").multipart(form)).await?;
        parse_response(response).await
    }
}
