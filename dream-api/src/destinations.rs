use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use dream_core::{BackendError, Destination, TransportOption};

use crate::chrome::SiteChrome;
use crate::middleware::auth::optional_session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DestinationsView {
    pub chrome: SiteChrome,
    pub destinations: Vec<Destination>,
    /// Set when the list is empty; an empty catalog is not an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct DestinationDetailView {
    pub chrome: SiteChrome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,
    pub transport_options: Vec<TransportOptionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options_empty_message: Option<&'static str>,
    /// Shown to guests so the book buttons are not a dead end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_in_notice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOptionView {
    #[serde(flatten)]
    pub option: TransportOption,
    pub sold_out: bool,
    pub book_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_href: Option<String>,
}

impl TransportOptionView {
    fn new(option: TransportOption, destination_id: u64) -> Self {
        let sold_out = option.available_seats == 0;
        Self {
            book_label: if sold_out { "Sold Out" } else { "Book Now" },
            book_href: (!sold_out).then(|| {
                format!(
                    "/booking?transportOptionId={}&destinationId={}",
                    option.id, destination_id
                )
            }),
            sold_out,
            option,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/destinations", get(list_destinations))
        .route("/destinations/{id}", get(destination_details))
}

async fn list_destinations(State(state): State<AppState>) -> Json<DestinationsView> {
    match state.queries.destinations().await {
        Ok(destinations) => {
            let empty_message = destinations
                .is_empty()
                .then_some("No destinations available at the moment.");
            Json(DestinationsView {
                chrome: SiteChrome::standard(),
                destinations,
                empty_message,
                error: None,
            })
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to load destinations");
            Json(DestinationsView {
                chrome: SiteChrome::standard(),
                destinations: Vec::new(),
                empty_message: None,
                error: Some("Failed to load destinations. Please try again later."),
            })
        }
    }
}

/// Backend trouble renders the error alert view; the page never comes back
/// blank.
async fn destination_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Json<DestinationDetailView> {
    let chrome = SiteChrome::standard();

    let destination = match state.queries.destination_by_id(id).await {
        Ok(destination) => destination,
        Err(err) => {
            let message = match &err {
                BackendError::NotFound(_) => "Destination not found.",
                _ => "Failed to load destination details.",
            };
            tracing::warn!(destination_id = id, error = %err, "destination lookup failed");
            return Json(DestinationDetailView {
                chrome,
                destination: None,
                transport_options: Vec::new(),
                options_empty_message: None,
                sign_in_notice: None,
                error: Some(message),
            });
        }
    };

    // Options failing to load degrades to the empty-state alert; the
    // destination itself still renders.
    let options = state
        .queries
        .transport_options_by_destination(id)
        .await
        .unwrap_or_default();

    let options_empty_message = options
        .is_empty()
        .then_some("No transport options available for this destination yet. Check back soon!");
    let signed_in = optional_session(&state, &headers).is_some();
    let sign_in_notice = (!signed_in && !options.is_empty())
        .then_some("Please sign in to book transport options");

    Json(DestinationDetailView {
        chrome,
        transport_options: options
            .into_iter()
            .map(|o| TransportOptionView::new(o, destination.id))
            .collect(),
        destination: Some(destination),
        options_empty_message,
        sign_in_notice,
        error: None,
    })
}
