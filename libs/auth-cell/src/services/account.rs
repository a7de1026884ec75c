use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;
use tracing::{debug, error, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;
use shared_models::profile::{Profile, Role};

use crate::models::{LoginRequest, RegisterRequest, SessionResponse};

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{2,29}$").unwrap())
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// Account provisioning and session handling. The identity service owns
/// credentials and tokens; this service owns the profile and role-extension
/// rows that hang off an identity.
pub struct AccountService {
    supabase: SupabaseClient,
    default_doctor_specialization: Option<Uuid>,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            default_doctor_specialization: config.default_doctor_specialization,
        }
    }

    fn validate_registration(request: &RegisterRequest) -> Result<Role, AppError> {
        if !username_regex().is_match(&request.username) {
            return Err(AppError::ValidationError(
                "username must be 3-30 characters (letters, digits, '_', '.', '-')".to_string(),
            ));
        }
        if !email_regex().is_match(&request.email) {
            return Err(AppError::ValidationError("invalid email address".to_string()));
        }
        if request.password.is_empty() {
            return Err(AppError::ValidationError("password is required".to_string()));
        }

        match request.role.as_deref() {
            None => Ok(Role::Patient),
            Some(raw) => Role::from_str(raw).map_err(|_| {
                AppError::ValidationError(
                    "role must be one of PATIENT, DOCTOR, ADMIN".to_string(),
                )
            }),
        }
    }

    /// Create identity, profile and role-extension. The profile and its
    /// extension land in one store transaction (provision_profile RPC); if
    /// that transaction fails the freshly created identity is rolled back so
    /// no half-provisioned account survives.
    pub async fn register(&self, request: RegisterRequest) -> Result<SessionResponse, AppError> {
        let role = Self::validate_registration(&request)?;
        info!("Registering {} with role {}", request.username, role);

        let session = self
            .supabase
            .sign_up(&request.username, &request.email, &request.password)
            .await?;
        let identity = session.user;

        let specialization_id = match role {
            Role::Doctor => self.default_doctor_specialization,
            _ => None,
        };

        let provisioned: Result<Profile, AppError> = self
            .supabase
            .rpc(
                "provision_profile",
                json!({
                    "p_identity_id": identity.id,
                    "p_username": identity.username,
                    "p_email": identity.email,
                    "p_role": role,
                    "p_phone": request.phone,
                    "p_specialization_id": specialization_id,
                }),
            )
            .await;

        let profile = match provisioned {
            Ok(profile) => profile,
            Err(e) => {
                if let Err(cleanup) = self.supabase.admin_delete_user(identity.id).await {
                    error!(
                        "failed to roll back identity {} after provisioning failure: {}",
                        identity.id, cleanup
                    );
                }
                return Err(e);
            }
        };

        debug!("Provisioned profile {} for identity {}", profile.id, identity.id);

        // ADMIN carries no extension row; PATIENT and DOCTOR extensions are
        // created by the RPC and share the profile id.
        let profile_id = match role {
            Role::Admin => None,
            _ => Some(profile.id),
        };

        Ok(SessionResponse {
            id: identity.id,
            username: identity.username,
            role,
            profile_id,
            token: session.access_token,
        })
    }

    /// Verify credentials and return the session alongside the resolved role
    /// and role-extension id. A doctor without an extension row logs in with
    /// a null profile id rather than failing.
    pub async fn login(&self, request: LoginRequest) -> Result<SessionResponse, AppError> {
        let session = self
            .supabase
            .sign_in(&request.username, &request.password)
            .await?;

        let caller = self.supabase.resolve_caller(session.user.id).await?;

        Ok(SessionResponse {
            id: session.user.id,
            username: session.user.username,
            role: caller.role(),
            profile_id: caller.extension_id,
            token: session.access_token,
        })
    }
}
