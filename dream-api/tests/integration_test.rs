use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use dream_api::middleware::auth::SessionClaims;
use dream_api::{app, AppState, AuthConfig};
use dream_core::{BackendApi, MockIdResolver, Principal, TransportType, UserRole};
use dream_query::{MemoryBackend, Queries, QueryCache};

const SECRET: &str = "integration-test-secret";

fn test_state(backend: Arc<MemoryBackend>) -> AppState {
    let queries = Queries::new(backend as Arc<dyn BackendApi>, Arc::new(QueryCache::new()));
    AppState::new(
        queries,
        Arc::new(MockIdResolver),
        AuthConfig {
            secret: SECRET.to_string(),
            expiration: 3600,
        },
    )
}

fn token_for(did: &str) -> String {
    let claims = SessionClaims {
        sub: did.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn home_page_carries_site_chrome() {
    let state = test_state(Arc::new(MemoryBackend::new()));
    let (status, body) = send(&state, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chrome"]["brand"], "DreamDestination");
    let labels: Vec<&str> = body["chrome"]["nav"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Home", "Destinations", "Booking", "About", "Contact", "Login"]);
}

#[tokio::test]
async fn empty_destination_list_renders_the_empty_state_not_an_error() {
    let state = test_state(Arc::new(MemoryBackend::new()));
    let (status, body) = send(&state, get("/destinations")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destinations"].as_array().unwrap().len(), 0);
    assert_eq!(body["empty_message"], "No destinations available at the moment.");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn seeded_destinations_come_back_in_the_list_view() {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed_demo();
    let state = test_state(backend);

    let (status, body) = send(&state, get("/destinations")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["destinations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Santorini"));
    assert!(names.contains(&"Kyoto"));
}

#[tokio::test]
async fn missing_destination_renders_the_error_view_not_a_blank_page() {
    let state = test_state(Arc::new(MemoryBackend::new()));
    let (status, body) = send(&state, get("/destinations/999")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Destination not found.");
    assert!(body.get("destination").is_none());
}

#[tokio::test]
async fn destination_detail_flags_sold_out_options_and_prompts_guests() {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed_demo();
    let sold_out = backend.seed_transport_option(1, TransportType::Train, "Weekly", 0);
    let state = test_state(backend);

    let (status, body) = send(&state, get("/destinations/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"]["name"], "Santorini");
    assert_eq!(body["sign_in_notice"], "Please sign in to book transport options");

    let options = body["transport_options"].as_array().unwrap();
    let flagged = options
        .iter()
        .find(|o| o["id"].as_u64() == Some(sold_out))
        .unwrap();
    assert_eq!(flagged["soldOut"], true);
    assert_eq!(flagged["bookLabel"], "Sold Out");
    assert!(flagged.get("bookHref").is_none());

    let open = options.iter().find(|o| o["id"].as_u64() != Some(sold_out)).unwrap();
    assert_eq!(open["bookLabel"], "Book Now");
}

#[tokio::test]
async fn unauthenticated_booking_page_gets_the_sign_in_prompt_and_no_backend_call() {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed_demo();
    let state = test_state(Arc::clone(&backend));

    let (status, body) = send(&state, get("/booking?transportOptionId=1")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please sign in to create and view your bookings");
    assert_eq!(backend.call_count("get_bookings_by_caller"), 0);
    assert_eq!(backend.call_count("get_transport_option_by_id"), 0);
}

#[tokio::test]
async fn booking_page_prefills_from_the_selected_option() {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed_demo();
    let option_id = backend.seed_transport_option(2, TransportType::Train, "Hourly 06:00-22:00", 30);
    let state = test_state(backend);
    let token = token_for("did:web:example:alice");

    let uri = format!("/booking?transportOptionId={option_id}&destinationId=2");
    let (status, body) = send(&state, get_authed(&uri, &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["form"]["booking_type"], "train");
    assert_eq!(body["form"]["to"], "Kyoto");
    assert_eq!(body["selected"]["schedule"], "Hourly 06:00-22:00");
    assert_eq!(body["selected"]["destinationCity"], "Kyoto");
}

#[tokio::test]
async fn booking_submit_succeeds_resets_the_form_and_shows_up_in_history() {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed_demo();
    let option_id = backend.seed_transport_option(1, TransportType::Flight, "Daily 09:15", 8);
    let state = test_state(backend);
    let token = token_for("did:web:example:alice");

    let submission = json!({
        "bookingType": "flight",
        "from": "Oslo",
        "to": "Thira",
        "date": "2026-09-12",
        "time": "09:15",
        "passengers": "2",
        "transportOptionId": option_id,
        "destinationId": 1,
    });
    let (status, body) = send(
        &state,
        json_request(Method::POST, "/booking", Some(&token), &submission),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking created successfully!");
    assert!(body["bookingId"].as_u64().unwrap() > 0);
    assert_eq!(body["form"]["from"], "");

    let (_, page) = send(&state, get_authed("/booking", &token)).await;
    let history = page["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["details"]["destinationName"], "Santorini");
    assert_eq!(history[0]["details"]["passengers"], 2);
}

#[tokio::test]
async fn booking_failure_echoes_the_form_with_the_mapped_message() {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed_demo();
    let option_id = backend.seed_transport_option(1, TransportType::Flight, "Daily", 1);
    let state = test_state(Arc::clone(&backend));
    let token = token_for("did:web:example:alice");

    let submission = json!({
        "bookingType": "flight",
        "from": "Oslo",
        "to": "Thira",
        "date": "2026-09-12",
        "time": "09:15",
        "passengers": "3",
        "transportOptionId": option_id,
    });
    let (status, body) = send(
        &state,
        json_request(Method::POST, "/booking", Some(&token), &submission),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["formError"],
        "Only 1 seat(s) available. Please reduce the number of passengers."
    );
    assert_eq!(body["form"]["from"], "Oslo");
    assert!(body.get("bookingId").is_none());
    assert_eq!(backend.call_count("create_booking"), 0);
}

#[tokio::test]
async fn contact_form_reports_every_field_error_at_once() {
    let state = test_state(Arc::new(MemoryBackend::new()));
    let submission = json!({ "name": "", "email": "nope", "message": "short" });

    let (status, body) = send(
        &state,
        json_request(Method::POST, "/contact", None, &submission),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let fields: Vec<&str> = body["fieldErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "message"]);
    assert_eq!(body["form"]["email"], "nope");
}

#[tokio::test]
async fn valid_contact_submission_is_acknowledged() {
    let backend = Arc::new(MemoryBackend::new());
    let state = test_state(Arc::clone(&backend));
    let submission = json!({
        "name": "Ada",
        "email": "ada@example.org",
        "message": "I would like to visit Kyoto in the autumn.",
    });

    let (status, body) = send(
        &state,
        json_request(Method::POST, "/contact", None, &submission),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Your message has been sent successfully. We'll get back to you soon!"
    );
    assert_eq!(backend.call_count("submit_contact_inquiry"), 1);
}

#[tokio::test]
async fn login_verifies_the_presentation_and_issues_a_usable_token() {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed_demo();
    let state = test_state(backend);

    let presentation = json!({
        "did": "did:web:dreamdestination.example:alice",
        "proof": { "type": "mock" },
    });
    let (status, body) = send(
        &state,
        json_request(Method::POST, "/login", None, &presentation),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principal"], "did:web:dreamdestination.example:alice");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, page) = send(&state, get_authed("/booking", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["title"], "Book Your Journey");
}

#[tokio::test]
async fn login_rejects_a_malformed_presentation() {
    let state = test_state(Arc::new(MemoryBackend::new()));
    let presentation = json!({ "did": "alice@example.com", "proof": {} });

    let (status, body) = send(
        &state,
        json_request(Method::POST, "/login", None, &presentation),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("not a DID"));
}

#[tokio::test]
async fn profile_routes_are_gated_and_round_trip() {
    let backend = Arc::new(MemoryBackend::new());
    let state = test_state(backend);
    let token = token_for("did:web:example:alice");

    let (status, body) = send(&state, get("/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please sign in to continue");

    let profile = json!({ "name": "Alice", "email": "alice@example.org" });
    let (status, _) = send(
        &state,
        json_request(Method::PUT, "/profile", Some(&token), &profile),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&state, get_authed("/profile", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["name"], "Alice");
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn admin_routes_require_the_admin_role() {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed_demo();
    backend.set_role(Principal::from("did:web:example:root"), UserRole::Admin);
    let state = test_state(Arc::clone(&backend));

    let request = json!({
        "destinationId": 1,
        "transportType": "train",
        "schedule": "Nightly 23:00",
        "availableSeats": 40,
    });

    let user_token = token_for("did:web:example:alice");
    let (status, body) = send(
        &state,
        json_request(Method::POST, "/admin/transport-options", Some(&user_token), &request),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");

    let admin_token = token_for("did:web:example:root");
    let (status, body) = send(
        &state,
        json_request(Method::POST, "/admin/transport-options", Some(&admin_token), &request),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_id = body["id"].as_u64().unwrap();

    let option = backend.get_transport_option_by_id(new_id).await.unwrap();
    assert_eq!(option.schedule, "Nightly 23:00");
}

#[tokio::test]
async fn admin_can_assign_roles_and_read_inquiries() {
    let backend = Arc::new(MemoryBackend::new());
    backend.set_role(Principal::from("did:web:example:root"), UserRole::Admin);
    let state = test_state(Arc::clone(&backend));
    let admin_token = token_for("did:web:example:root");

    let assignment = json!({ "principal": "did:web:example:alice", "role": "admin" });
    let (status, _) = send(
        &state,
        json_request(Method::POST, "/admin/roles", Some(&admin_token), &assignment),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(backend
        .is_caller_admin(&Principal::from("did:web:example:alice"))
        .await
        .unwrap());

    backend
        .submit_contact_inquiry("Ada", "ada@example.org", "A long enough message.", 42)
        .await
        .unwrap();
    let (status, body) = send(&state, get_authed("/admin/contact-inquiries", &admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["email"], "ada@example.org");
}
