use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dream_core::{BackendError, BookingType, Principal, TransportOption};
use dream_query::Queries;

/// Raw booking form input as submitted by the user. `passengers` stays a
/// string until validation so a garbled count is reported, not swallowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingForm {
    pub booking_type: BookingType,
    pub from: String,
    pub to: String,
    pub date: String,
    pub time: String,
    pub passengers: String,
}

impl BookingForm {
    /// The empty form state the page returns to after a successful booking.
    pub fn reset(booking_type: BookingType) -> Self {
        Self {
            booking_type,
            from: String::new(),
            to: String::new(),
            date: String::new(),
            time: String::new(),
            passengers: "1".to_string(),
        }
    }
}

/// Payload encoded into the booking's opaque `details` string. The backend
/// stores it untouched; the history view decodes it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub from: String,
    pub to: String,
    pub date: String,
    pub time: String,
    pub passengers: u64,
    pub schedule: String,
    pub destination_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingFormError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passengers must be at least 1")]
    InvalidPassengers,

    #[error("Only {available} seat(s) available. Please reduce the number of passengers.")]
    NotEnoughSeats { available: u64 },

    #[error("Please select a transport option from a destination page")]
    NoOptionSelected,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Form(#[from] BookingFormError),

    /// Backend rejection or failure, already mapped to user-facing text.
    #[error("{0}")]
    Rejected(String),
}

/// Validate a booking form against the currently selected transport option.
/// Checks run in order and the first failure wins. Returns the parsed
/// passenger count.
pub fn validate(
    form: &BookingForm,
    selected: Option<&TransportOption>,
) -> Result<u64, BookingFormError> {
    if form.from.trim().is_empty()
        || form.to.trim().is_empty()
        || form.date.trim().is_empty()
        || form.time.trim().is_empty()
    {
        return Err(BookingFormError::MissingFields);
    }

    let passengers: u64 = match form.passengers.trim().parse() {
        Ok(n) if n >= 1 => n,
        _ => return Err(BookingFormError::InvalidPassengers),
    };

    if let Some(option) = selected {
        if passengers > option.available_seats {
            return Err(BookingFormError::NotEnoughSeats {
                available: option.available_seats,
            });
        }
    }

    if selected.is_none() {
        return Err(BookingFormError::NoOptionSelected);
    }

    Ok(passengers)
}

/// Rewrite known backend rejections into the site's user-facing wording;
/// anything unrecognized passes through verbatim.
pub fn map_backend_error(err: BackendError) -> String {
    fn friendly(err: &BackendError) -> Option<&'static str> {
        match err {
            BackendError::NoSeats => Some("Sorry, there are no available seats for this option."),
            BackendError::OptionNotFound => {
                Some("The selected transport option is no longer available.")
            }
            BackendError::TypeMismatch => {
                Some("Booking type does not match the transport option.")
            }
            _ => None,
        }
    }

    if let Some(msg) = friendly(&err) {
        return msg.to_string();
    }
    // Raw text that slipped through unclassified still gets one chance.
    if let BackendError::Other(raw) = &err {
        if let Some(msg) = friendly(&BackendError::from_message(raw)) {
            return msg.to_string();
        }
    }
    err.to_string()
}

/// The booking-creation workflow: validate, serialize the details payload,
/// submit, then mark the dependent cache entries stale.
///
/// There is no retry and no idempotency key; a double submit creates two
/// bookings.
pub struct BookingWorkflow {
    queries: Queries,
}

impl BookingWorkflow {
    pub fn new(queries: Queries) -> Self {
        Self { queries }
    }

    /// Look up the selected option for prefill and validation. The sentinel
    /// id 0 means nothing is selected; lookup failures degrade to "no
    /// selection" exactly as the page does.
    pub async fn selected_option(&self, transport_option_id: u64) -> Option<TransportOption> {
        if transport_option_id == 0 {
            return None;
        }
        self.queries
            .transport_option_by_id(transport_option_id)
            .await
            .ok()
    }

    pub async fn submit(
        &self,
        caller: &Principal,
        form: &BookingForm,
        transport_option_id: u64,
        destination_id: Option<u64>,
    ) -> Result<u64, BookingError> {
        let selected = self.selected_option(transport_option_id).await;
        let passengers = validate(form, selected.as_ref())?;
        // Validation guarantees a selection from here on.
        let option = selected.ok_or(BookingFormError::NoOptionSelected)?;

        let destination = match destination_id {
            Some(id) if id > 0 => self.queries.destination_by_id(id).await.ok(),
            _ => None,
        };

        let to = form.to.trim().to_string();
        let details = BookingDetails {
            from: form.from.trim().to_string(),
            to: to.clone(),
            date: form.date.trim().to_string(),
            time: form.time.trim().to_string(),
            passengers,
            schedule: option.schedule.clone(),
            destination_name: destination.map(|d| d.name).unwrap_or(to),
        };
        let details = serde_json::to_string(&details)
            .map_err(|e| BookingError::Rejected(format!("Failed to encode booking details: {e}")))?;

        let created_at = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        match self
            .queries
            .backend()
            .create_booking(caller, form.booking_type, &details, created_at, option.id)
            .await
        {
            Ok(booking_id) => {
                tracing::info!(booking_id, option_id = option.id, caller = %caller, "booking created");
                self.queries.invalidate_after_booking(option.id);
                Ok(booking_id)
            }
            Err(err) => {
                tracing::warn!(option_id = option.id, error = %err, "booking rejected");
                Err(BookingError::Rejected(map_backend_error(err)))
            }
        }
    }
}
