use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_role_key: "test-service-role-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_role_key: self.supabase_service_role_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            default_doctor_specialization: None,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("testuser", "test@example.com")
    }
}

impl TestUser {
    pub fn new(username: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "username": user.username,
            "email": user.email,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned store rows for wiremock-backed handler tests.
pub struct MockStoreRows;

impl MockStoreRows {
    pub fn profile(profile_id: Uuid, identity_id: Uuid, username: &str, role: &str) -> Value {
        json!({
            "id": profile_id,
            "identity_id": identity_id,
            "username": username,
            "email": format!("{}@example.com", username),
            "role": role,
            "phone": null,
            "address": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn patient_extension(profile_id: Uuid) -> Value {
        json!({
            "profile_id": profile_id,
            "date_of_birth": null,
            "medical_history": null
        })
    }

    pub fn doctor_extension(profile_id: Uuid, specialization_id: Option<Uuid>) -> Value {
        json!({
            "profile_id": profile_id,
            "specialization_id": specialization_id,
            "license_number": "LIC-12345",
            "rating": 0.0
        })
    }

    pub fn specialization(id: Uuid, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": null,
            "icon": null
        })
    }

    pub fn disease(id: Uuid, name: &str, specialization_id: Option<Uuid>) -> Value {
        json!({
            "id": id,
            "name": name,
            "specialization_id": specialization_id,
            "symptoms": null
        })
    }

    pub fn appointment(
        id: Uuid,
        patient_id: Uuid,
        doctor_id: Uuid,
        appointment_date: &str,
        status: &str,
    ) -> Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "appointment_date": appointment_date,
            "status": status,
            "notes": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn session(user: &TestUser, token: &str) -> Value {
        json!({
            "access_token": token,
            "user": {
                "id": user.id,
                "username": user.username,
                "email": user.email
            }
        })
    }

    pub fn error(message: &str) -> Value {
        json!({ "error": message })
    }
}
