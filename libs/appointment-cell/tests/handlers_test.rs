use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers::{
    create_appointment, doctor_appointments, get_appointment, list_appointments,
    update_appointment,
};
use appointment_cell::models::{CreateAppointmentRequest, UpdateAppointmentRequest};
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestUser};

fn auth_user(user: &TestUser) -> AuthUser {
    AuthUser {
        id: user.id,
        username: Some(user.username.clone()),
        email: Some(user.email.clone()),
    }
}

/// Mounts the profile and extension lookups that back caller resolution.
/// Returns the caller's profile id.
async fn mount_caller(mock_server: &MockServer, user: &TestUser, role: &str) -> Uuid {
    let profile_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("identity_id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::profile(profile_id, user.id, &user.username, role),
        ])))
        .mount(mock_server)
        .await;

    let extension_table = match role {
        "PATIENT" => "patient_profiles",
        "DOCTOR" => "doctor_profiles",
        _ => return profile_id,
    };
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", extension_table)))
        .and(query_param("profile_id", format!("eq.{}", profile_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "profile_id": profile_id },
        ])))
        .mount(mock_server)
        .await;

    profile_id
}

fn booking_request(patient_id: Uuid, doctor_id: Uuid) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_id,
        doctor_id,
        appointment_date: "2025-03-01T10:00:00Z".parse().unwrap(),
        notes: Some("first visit".to_string()),
    }
}

#[tokio::test]
async fn test_create_appointment_forces_pending_status() {
    let mock_server = MockServer::start().await;
    let user = TestUser::default();
    let patient_id = mount_caller(&mock_server, &user, "PATIENT").await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_profiles"))
        .and(query_param("profile_id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "profile_id": doctor_id },
        ])))
        .mount(&mock_server)
        .await;

    // The insert must carry status PENDING regardless of client input.
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "status": "PENDING" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::appointment(
                Uuid::new_v4(),
                patient_id,
                doctor_id,
                "2025-03-01T10:00:00Z",
                "PENDING",
            ),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = create_appointment(
        State(config),
        Extension(auth_user(&user)),
        axum::Json(booking_request(patient_id, doctor_id)),
    )
    .await;

    let (status, body) = result.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.0["status"], "PENDING");
    assert_eq!(body.0["patient_id"], json!(patient_id));
}

#[tokio::test]
async fn test_create_appointment_for_other_patient_is_forbidden() {
    let mock_server = MockServer::start().await;
    let user = TestUser::default();
    mount_caller(&mock_server, &user, "PATIENT").await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = create_appointment(
        State(config),
        Extension(auth_user(&user)),
        axum::Json(booking_request(Uuid::new_v4(), Uuid::new_v4())),
    )
    .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_create_appointment_by_doctor_is_forbidden() {
    let mock_server = MockServer::start().await;
    let user = TestUser::new("dr_yang", "dr_yang@example.com");
    let profile_id = mount_caller(&mock_server, &user, "DOCTOR").await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = create_appointment(
        State(config),
        Extension(auth_user(&user)),
        axum::Json(booking_request(profile_id, Uuid::new_v4())),
    )
    .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_create_appointment_unknown_doctor() {
    let mock_server = MockServer::start().await;
    let user = TestUser::default();
    let patient_id = mount_caller(&mock_server, &user, "PATIENT").await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_profiles"))
        .and(query_param("profile_id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = create_appointment(
        State(config),
        Extension(auth_user(&user)),
        axum::Json(booking_request(patient_id, doctor_id)),
    )
    .await;

    match result.unwrap_err() {
        AppError::ValidationError(msg) => {
            assert_eq!(msg, "Invalid patient or doctor ID provided")
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_appointments_scoped_to_patient() {
    let mock_server = MockServer::start().await;
    let user = TestUser::default();
    let patient_id = mount_caller(&mock_server, &user, "PATIENT").await;
    let doctor_id = Uuid::new_v4();

    // Only matches when the query is narrowed to the caller's patient id.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("patient_id", format!("eq.{}", patient_id)))
        .and(query_param("order", "appointment_date.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment(
                Uuid::new_v4(),
                patient_id,
                doctor_id,
                "2025-03-01T10:00:00Z",
                "PENDING",
            ),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = list_appointments(State(config), Extension(auth_user(&user))).await;

    let body = result.unwrap().0;
    let appointments = body.as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["patient_id"], json!(patient_id));
}

#[tokio::test]
async fn test_list_appointments_admin_sees_all() {
    let mock_server = MockServer::start().await;
    let user = TestUser::new("admin", "admin@example.com");
    mount_caller(&mock_server, &user, "ADMIN").await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "appointment_date.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Uuid::new_v4(),
                "2025-03-01T10:00:00Z",
                "PENDING",
            ),
            MockStoreRows::appointment(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Uuid::new_v4(),
                "2025-03-02T10:00:00Z",
                "CONFIRMED",
            ),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = list_appointments(State(config), Extension(auth_user(&user))).await;

    assert_eq!(result.unwrap().0.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_appointments_doctor_without_extension_sees_nothing() {
    let mock_server = MockServer::start().await;
    let user = TestUser::new("drnew", "drnew@example.com");
    let profile_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::profile(profile_id, user.id, "drnew", "DOCTOR"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    // The appointments table must not be consulted at all.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = list_appointments(State(config), Extension(auth_user(&user))).await;

    assert_eq!(result.unwrap().0.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_appointment_forbidden_for_stranger() {
    let mock_server = MockServer::start().await;
    let user = TestUser::default();
    mount_caller(&mock_server, &user, "PATIENT").await;

    let appointment_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment(
                appointment_id,
                Uuid::new_v4(),
                Uuid::new_v4(),
                "2025-03-01T10:00:00Z",
                "PENDING",
            ),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = get_appointment(
        State(config),
        Extension(auth_user(&user)),
        Path(appointment_id),
    )
    .await;

    match result.unwrap_err() {
        AppError::Forbidden(msg) => {
            assert_eq!(msg, "Not authorized to access this appointment")
        }
        other => panic!("Expected Forbidden, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_appointment_includes_party_names() {
    let mock_server = MockServer::start().await;
    let user = TestUser::default();
    let patient_id = mount_caller(&mock_server, &user, "PATIENT").await;

    let appointment_id = Uuid::new_v4();
    let mut row = MockStoreRows::appointment(
        appointment_id,
        patient_id,
        Uuid::new_v4(),
        "2025-03-01T10:00:00Z",
        "CONFIRMED",
    );
    row["patient"] = json!({ "profile": { "username": "testuser" } });
    row["doctor"] = json!({ "profile": { "username": "dr_yang" } });

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = get_appointment(
        State(config),
        Extension(auth_user(&user)),
        Path(appointment_id),
    )
    .await;

    let body = result.unwrap().0;
    assert_eq!(body["patient_name"], "testuser");
    assert_eq!(body["doctor_name"], "dr_yang");
    assert_eq!(body["status"], "CONFIRMED");
}

#[tokio::test]
async fn test_update_appointment_rejects_unknown_status() {
    let mock_server = MockServer::start().await;
    let user = TestUser::new("admin", "admin@example.com");
    mount_caller(&mock_server, &user, "ADMIN").await;

    let appointment_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment(
                appointment_id,
                Uuid::new_v4(),
                Uuid::new_v4(),
                "2025-03-01T10:00:00Z",
                "PENDING",
            ),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = update_appointment(
        State(config),
        Extension(auth_user(&user)),
        Path(appointment_id),
        axum::Json(UpdateAppointmentRequest {
            appointment_date: None,
            status: Some("LATER".to_string()),
            notes: None,
        }),
    )
    .await;

    assert!(matches!(result.unwrap_err(), AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_update_appointment_with_empty_patch_writes_nothing() {
    let mock_server = MockServer::start().await;
    let user = TestUser::new("admin", "admin@example.com");
    mount_caller(&mock_server, &user, "ADMIN").await;

    let appointment_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment(
                appointment_id,
                Uuid::new_v4(),
                Uuid::new_v4(),
                "2025-03-01T10:00:00Z",
                "PENDING",
            ),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = update_appointment(
        State(config),
        Extension(auth_user(&user)),
        Path(appointment_id),
        axum::Json(UpdateAppointmentRequest {
            appointment_date: None,
            status: None,
            notes: None,
        }),
    )
    .await;

    let body = result.unwrap().0;
    assert_eq!(body["id"], json!(appointment_id));
    assert_eq!(body["status"], "PENDING");
}

#[tokio::test]
async fn test_doctor_appointments_unknown_identity() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = doctor_appointments(State(config), Path(Uuid::new_v4())).await;

    match result.unwrap_err() {
        AppError::NotFound(msg) => assert!(msg.contains("Doctor profile")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_doctor_appointments_requires_doctor_extension() {
    let mock_server = MockServer::start().await;
    let identity_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::profile(Uuid::new_v4(), identity_id, "notadoctor", "PATIENT"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = doctor_appointments(State(config), Path(identity_id)).await;

    match result.unwrap_err() {
        AppError::NotFound(msg) => assert_eq!(msg, "Doctor profile not found"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_doctor_appointments_lists_schedule() {
    let mock_server = MockServer::start().await;
    let identity_id = Uuid::new_v4();
    let profile_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("identity_id", format!("eq.{}", identity_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::profile(profile_id, identity_id, "dr_yang", "DOCTOR"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_profiles"))
        .and(query_param("profile_id", format!("eq.{}", profile_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "profile_id": profile_id },
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", profile_id)))
        .and(query_param("order", "appointment_date.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment(
                Uuid::new_v4(),
                Uuid::new_v4(),
                profile_id,
                "2025-03-01T10:00:00Z",
                "PENDING",
            ),
            MockStoreRows::appointment(
                Uuid::new_v4(),
                Uuid::new_v4(),
                profile_id,
                "2025-03-02T09:00:00Z",
                "CONFIRMED",
            ),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = doctor_appointments(State(config), Path(identity_id)).await;

    let body = result.unwrap().0;
    let appointments = body.as_array().unwrap();
    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0]["doctor_id"], json!(profile_id));
}
