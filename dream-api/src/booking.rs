use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use dream_booking::{BookingDetails, BookingError, BookingForm};
use dream_core::{Booking, BookingType, Destination, TransportOption};

use crate::chrome::SiteChrome;
use crate::error::AppError;
use crate::middleware::auth::optional_session;
use crate::state::AppState;

const SIGN_IN_PROMPT: &str = "Please sign in to create and view your bookings";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPageParams {
    #[serde(default)]
    pub transport_option_id: Option<u64>,
    #[serde(default)]
    pub destination_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct BookingPageView {
    pub chrome: SiteChrome,
    pub title: &'static str,
    pub form: BookingForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectedOptionView>,
    pub history: Vec<BookingHistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_error: Option<&'static str>,
}

/// Summary card for the option carried over from a destination page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOptionView {
    #[serde(flatten)]
    pub option: TransportOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_city: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingHistoryEntry {
    pub id: u64,
    pub booking_type: BookingType,
    pub created_at: i64,
    /// Decoded details payload; opaque or corrupt details render without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BookingDetails>,
}

impl From<Booking> for BookingHistoryEntry {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            booking_type: booking.booking_type,
            created_at: booking.created_at,
            details: serde_json::from_str(&booking.details).ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookingRequest {
    pub booking_type: BookingType,
    pub from: String,
    pub to: String,
    pub date: String,
    pub time: String,
    pub passengers: String,
    pub transport_option_id: u64,
    #[serde(default)]
    pub destination_id: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmitView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
    /// Reset on success; echoed back untouched on failure so nothing the
    /// visitor typed is lost.
    pub form: BookingForm,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/booking", get(booking_page).post(submit_booking))
}

async fn booking_page(
    State(state): State<AppState>,
    Query(params): Query<BookingPageParams>,
    headers: HeaderMap,
) -> Result<Json<BookingPageView>, AppError> {
    let session = optional_session(&state, &headers)
        .ok_or_else(|| AppError::AuthenticationError(SIGN_IN_PROMPT.to_string()))?;
    let caller = session.principal();

    let option_id = params.transport_option_id.unwrap_or(0);
    let selected = state.booking.selected_option(option_id).await;
    let destination: Option<Destination> = match params.destination_id {
        Some(id) if id > 0 => state.queries.destination_by_id(id).await.ok(),
        _ => None,
    };

    let mut form = BookingForm::reset(BookingType::Flight);
    if let (Some(option), Some(dest)) = (&selected, &destination) {
        form.booking_type = BookingType::from(option.transport_type);
        form.to = dest.city.clone();
    }

    let (history, history_error) = match state.queries.my_bookings(&caller).await {
        Ok(bookings) => (
            bookings.into_iter().map(BookingHistoryEntry::from).collect(),
            None,
        ),
        Err(err) => {
            tracing::warn!(caller = %caller, error = %err, "booking history load failed");
            (Vec::new(), Some("Failed to load your bookings. Please try again later."))
        }
    };

    Ok(Json(BookingPageView {
        chrome: SiteChrome::standard(),
        title: "Book Your Journey",
        form,
        selected: selected.map(|option| SelectedOptionView {
            option,
            destination_city: destination.map(|d| d.city),
        }),
        history,
        history_error,
    }))
}

async fn submit_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitBookingRequest>,
) -> Result<Json<BookingSubmitView>, AppError> {
    let session = optional_session(&state, &headers)
        .ok_or_else(|| AppError::AuthenticationError(SIGN_IN_PROMPT.to_string()))?;
    let caller = session.principal();

    let form = BookingForm {
        booking_type: req.booking_type,
        from: req.from,
        to: req.to,
        date: req.date,
        time: req.time,
        passengers: req.passengers,
    };

    match state
        .booking
        .submit(&caller, &form, req.transport_option_id, req.destination_id)
        .await
    {
        Ok(booking_id) => Ok(Json(BookingSubmitView {
            message: Some("Booking created successfully!"),
            booking_id: Some(booking_id),
            form_error: None,
            form: BookingForm::reset(form.booking_type),
        })),
        Err(BookingError::Form(err)) => Ok(Json(BookingSubmitView {
            message: None,
            booking_id: None,
            form_error: Some(err.to_string()),
            form,
        })),
        Err(BookingError::Rejected(msg)) => Ok(Json(BookingSubmitView {
            message: None,
            booking_id: None,
            form_error: Some(msg),
            form,
        })),
    }
}
