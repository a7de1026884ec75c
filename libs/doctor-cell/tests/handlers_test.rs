use axum::extract::{Path, Query, State};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::handlers::{doctors_by_disease, search_doctors, DoctorSearchQuery};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig};

fn doctor_row(username: &str, specialization: Option<(Uuid, &str)>) -> serde_json::Value {
    let mut row = MockStoreRows::doctor_extension(Uuid::new_v4(), specialization.map(|(id, _)| id));
    row["profile"] = json!({ "username": username });
    row["specialization"] = match specialization {
        Some((id, name)) => MockStoreRows::specialization(id, name),
        None => json!(null),
    };
    row
}

#[tokio::test]
async fn test_search_doctors_filters_on_username_and_specialization() {
    let mock_server = MockServer::start().await;
    let cardiology = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_row("dr_house", Some((Uuid::new_v4(), "Diagnostics"))),
            doctor_row("dr_yang", Some((cardiology, "Cardiology"))),
            doctor_row("heartman", None),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();

    let result = search_doctors(
        State(config.clone()),
        Query(DoctorSearchQuery {
            search: Some("heart".to_string()),
        }),
    )
    .await;
    let body = result.unwrap().0;
    let doctors = body.as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["username"], "heartman");

    let result = search_doctors(
        State(config.clone()),
        Query(DoctorSearchQuery {
            search: Some("cardio".to_string()),
        }),
    )
    .await;
    let body = result.unwrap().0;
    let doctors = body.as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["username"], "dr_yang");

    let result = search_doctors(State(config), Query(DoctorSearchQuery { search: None })).await;
    assert_eq!(result.unwrap().0.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_doctors_by_disease_unknown_disease() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/diseases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = doctors_by_disease(State(config), Path(Uuid::new_v4())).await;

    match result.unwrap_err() {
        AppError::NotFound(msg) => assert!(msg.contains("Disease")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_doctors_by_disease_without_specialization_is_empty() {
    let mock_server = MockServer::start().await;
    let disease_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/diseases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::disease(disease_id, "Mystery ailment", None),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = doctors_by_disease(State(config), Path(disease_id)).await;

    let body = result.unwrap().0;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_doctors_by_disease_matches_specialization() {
    let mock_server = MockServer::start().await;
    let disease_id = Uuid::new_v4();
    let cardiology = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/diseases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::disease(disease_id, "Angina", Some(cardiology)),
        ])))
        .mount(&mock_server)
        .await;

    // The doctor query must be narrowed to the disease's specialization.
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_profiles"))
        .and(query_param("specialization_id", format!("eq.{}", cardiology)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_row("dr_yang", Some((cardiology, "Cardiology"))),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_arc();
    let result = doctors_by_disease(State(config), Path(disease_id)).await;

    let body = result.unwrap().0;
    let doctors = body.as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["username"], "dr_yang");
    assert_eq!(doctors[0]["specialization"]["name"], "Cardiology");
}
