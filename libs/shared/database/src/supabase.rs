use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::auth::Session;
use shared_models::profile::{Caller, Profile, Role};

/// Thin client over the Supabase deployment: GoTrue identity endpoints under
/// `/auth/v1` and PostgREST under `/rest/v1`. The API authorizes requests
/// itself (see shared-models::policy), so data access uses the service role
/// key; only the identity endpoints run with the anon key.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

#[derive(Debug, serde::Deserialize)]
struct ExtensionRow {
    profile_id: Uuid,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
            service_role_key: config.supabase_service_role_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self, bearer: &str, prefer_representation: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(value) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", bearer)) {
            headers.insert(AUTHORIZATION, value);
        }
        if prefer_representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        headers
    }

    fn map_status(status: StatusCode, body: &str) -> AppError {
        match status.as_u16() {
            401 => AppError::Auth(body.to_string()),
            403 => AppError::Forbidden(body.to_string()),
            404 => AppError::NotFound(body.to_string()),
            400 | 409 | 422 => AppError::ValidationError(body.to_string()),
            _ => AppError::ExternalService(format!("store error ({}): {}", status, body)),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: HeaderMap,
    ) -> Result<reqwest::Response, AppError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut req = self.client.request(method, &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("store error ({}): {}", status, error_text);
            return Err(Self::map_status(status, &error_text));
        }

        Ok(response)
    }

    async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: HeaderMap,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body, headers).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Internal(format!("invalid response from store: {}", e)))
    }

    // ------------------------------------------------------------------
    // PostgREST
    // ------------------------------------------------------------------

    /// GET `/rest/v1/{query}` where `query` is a table name plus filters,
    /// e.g. `profiles?identity_id=eq.{id}`.
    pub async fn select<T>(&self, query: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", query);
        self.execute(
            Method::GET,
            &path,
            None,
            self.headers(&self.service_role_key, false),
        )
        .await
    }

    /// Single-row select; empty result becomes `NotFound` with `what`.
    pub async fn select_one<T>(&self, query: &str, what: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let mut rows: Vec<T> = self.select(query).await?;
        if rows.is_empty() {
            return Err(AppError::NotFound(format!("{} not found", what)));
        }
        Ok(rows.remove(0))
    }

    /// True when at least one row matches the query.
    pub async fn exists(&self, query: &str) -> Result<bool, AppError> {
        let rows: Vec<Value> = self.select(query).await?;
        Ok(!rows.is_empty())
    }

    /// POST a row and return the created representation.
    pub async fn insert<T>(&self, table: &str, body: Value) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", table);
        let mut rows: Vec<T> = self
            .execute(
                Method::POST,
                &path,
                Some(body),
                self.headers(&self.service_role_key, true),
            )
            .await?;

        if rows.is_empty() {
            return Err(AppError::Database(format!(
                "insert into {} returned no representation",
                table
            )));
        }
        Ok(rows.remove(0))
    }

    /// PATCH rows matching the query, returning the updated representations
    /// (empty when nothing matched).
    pub async fn update<T>(&self, query: &str, body: Value) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", query);
        self.execute(
            Method::PATCH,
            &path,
            Some(body),
            self.headers(&self.service_role_key, true),
        )
        .await
    }

    /// DELETE rows matching the query, returning the deleted representations
    /// so callers can distinguish "nothing matched".
    pub async fn delete<T>(&self, query: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", query);
        self.execute(
            Method::DELETE,
            &path,
            None,
            self.headers(&self.service_role_key, true),
        )
        .await
    }

    /// POST `/rest/v1/rpc/{function}` - used where several writes must land
    /// in one store transaction.
    pub async fn rpc<T>(&self, function: &str, args: Value) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/rpc/{}", function);
        self.execute(
            Method::POST,
            &path,
            Some(args),
            self.headers(&self.service_role_key, false),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Identity service
    // ------------------------------------------------------------------

    /// Create an identity and receive a fresh session for it. A taken
    /// username surfaces as a validation failure.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let body = json!({
            "username": username,
            "email": email,
            "password": password,
        });

        self.execute(
            Method::POST,
            "/auth/v1/signup",
            Some(body),
            self.headers(&self.anon_key, false),
        )
        .await
        .map_err(|e| match e {
            AppError::ValidationError(_) => {
                AppError::ValidationError("username already exists".to_string())
            }
            other => other,
        })
    }

    /// Password-grant login. Any credential mismatch (including unknown
    /// username) collapses into a single unauthorized error.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let body = json!({
            "username": username,
            "password": password,
        });

        self.execute(
            Method::POST,
            "/auth/v1/token?grant_type=password",
            Some(body),
            self.headers(&self.anon_key, false),
        )
        .await
        .map_err(|e| match e {
            AppError::ExternalService(msg) => AppError::ExternalService(msg),
            AppError::Internal(msg) => AppError::Internal(msg),
            _ => AppError::Auth("Invalid username or password".to_string()),
        })
    }

    /// Remove an identity; the store cascades the deletion to the profile
    /// and its role-extension row.
    pub async fn admin_delete_user(&self, identity_id: Uuid) -> Result<(), AppError> {
        let path = format!("/auth/v1/admin/users/{}", identity_id);
        self.send(
            Method::DELETE,
            &path,
            None,
            self.headers(&self.service_role_key, false),
        )
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            other => other,
        })?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Caller resolution
    // ------------------------------------------------------------------

    pub async fn get_profile_by_identity(&self, identity_id: Uuid) -> Result<Profile, AppError> {
        self.select_one(
            &format!("profiles?identity_id=eq.{}", identity_id),
            "Profile",
        )
        .await
    }

    /// Id of the role-extension row matching the profile's role, when the
    /// row exists. Extension ids equal the owning profile id.
    pub async fn get_extension_id(&self, profile: &Profile) -> Result<Option<Uuid>, AppError> {
        let table = match profile.role {
            Role::Patient => "patient_profiles",
            Role::Doctor => "doctor_profiles",
            Role::Admin => return Ok(None),
        };

        let rows: Vec<ExtensionRow> = self
            .select(&format!(
                "{}?profile_id=eq.{}&select=profile_id",
                table, profile.id
            ))
            .await?;

        Ok(rows.first().map(|row| row.profile_id))
    }

    /// Profile plus extension id for the authenticated identity.
    pub async fn resolve_caller(&self, identity_id: Uuid) -> Result<Caller, AppError> {
        let profile = self.get_profile_by_identity(identity_id).await?;
        let extension_id = self.get_extension_id(&profile).await?;
        Ok(Caller {
            profile,
            extension_id,
        })
    }
}
