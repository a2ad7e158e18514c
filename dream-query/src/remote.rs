use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use dream_core::{
    BackendApi, BackendError, Booking, BookingType, ContactInquiry, Destination, Principal,
    TransportOption, TransportType, UserProfile, UserRole,
};

/// Header carrying the verified caller principal on forwarded calls. The
/// live backend trusts this tier to have authenticated the caller.
const PRINCIPAL_HEADER: &str = "x-dream-principal";

/// HTTP client for the live booking backend.
///
/// The backend is opaque: non-2xx responses carry a plain-text reason, which
/// is classified through [`BackendError::from_message`] so rejected bookings
/// keep their meaning across the wire.
pub struct RemoteBackend {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| BackendError::Other(format!("malformed backend response: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, %body, "backend call rejected");
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        Err(BackendError::from_message(&body))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        self.read(response).await
    }

    async fn get_as<T: DeserializeOwned>(
        &self,
        caller: &Principal,
        path: &str,
    ) -> Result<T, BackendError> {
        let response = self
            .http
            .get(self.url(path))
            .header(PRINCIPAL_HEADER, caller.as_str())
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        self.read(response).await
    }

    async fn post_as<B: Serialize, T: DeserializeOwned>(
        &self,
        caller: Option<&Principal>,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(caller) = caller {
            request = request.header(PRINCIPAL_HEADER, caller.as_str());
        }
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        self.read(response).await
    }

    /// POST whose success response body is irrelevant (often empty).
    async fn post_unit<B: Serialize>(
        &self,
        caller: Option<&Principal>,
        path: &str,
        body: &B,
    ) -> Result<(), BackendError> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(caller) = caller {
            request = request.header(PRINCIPAL_HEADER, caller.as_str());
        }
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, %body, "backend call rejected");
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        Err(BackendError::from_message(&body))
    }
}

#[async_trait]
impl BackendApi for RemoteBackend {
    async fn get_destinations(&self) -> Result<Vec<Destination>, BackendError> {
        self.get("/destinations").await
    }

    async fn get_destination_by_id(&self, id: u64) -> Result<Destination, BackendError> {
        self.get(&format!("/destinations/{id}")).await
    }

    async fn get_transport_options_by_destination(
        &self,
        destination_id: u64,
    ) -> Result<Vec<TransportOption>, BackendError> {
        self.get(&format!("/destinations/{destination_id}/transport-options"))
            .await
    }

    async fn get_transport_option_by_id(&self, id: u64) -> Result<TransportOption, BackendError> {
        self.get(&format!("/transport-options/{id}")).await
    }

    async fn add_transport_option(
        &self,
        caller: &Principal,
        destination_id: u64,
        transport_type: TransportType,
        schedule: &str,
        available_seats: u64,
    ) -> Result<u64, BackendError> {
        self.post_as(
            Some(caller),
            "/transport-options",
            &json!({
                "destinationId": destination_id,
                "transportType": transport_type,
                "schedule": schedule,
                "availableSeats": available_seats,
            }),
        )
        .await
    }

    async fn create_booking(
        &self,
        caller: &Principal,
        booking_type: BookingType,
        details: &str,
        created_at: i64,
        transport_option_id: u64,
    ) -> Result<u64, BackendError> {
        self.post_as(
            Some(caller),
            "/bookings",
            &json!({
                "bookingType": booking_type,
                "details": details,
                "createdAt": created_at,
                "transportOptionId": transport_option_id,
            }),
        )
        .await
    }

    async fn get_bookings_by_caller(
        &self,
        caller: &Principal,
    ) -> Result<Vec<Booking>, BackendError> {
        self.get_as(caller, "/bookings").await
    }

    async fn get_booking_by_id(&self, booking_id: u64) -> Result<Booking, BackendError> {
        self.get(&format!("/bookings/{booking_id}")).await
    }

    async fn submit_contact_inquiry(
        &self,
        name: &str,
        email: &str,
        message: &str,
        timestamp: i64,
    ) -> Result<(), BackendError> {
        self.post_unit(
            None,
            "/contact-inquiries",
            &json!({
                "name": name,
                "email": email,
                "message": message,
                "timestamp": timestamp,
            }),
        )
        .await
    }

    async fn get_all_contact_inquiries(&self) -> Result<Vec<ContactInquiry>, BackendError> {
        self.get("/contact-inquiries").await
    }

    async fn get_caller_user_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<UserProfile>, BackendError> {
        self.get_as(caller, "/profile").await
    }

    async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: &UserProfile,
    ) -> Result<(), BackendError> {
        self.post_unit(Some(caller), "/profile", profile).await
    }

    async fn get_user_profile(
        &self,
        principal: &Principal,
    ) -> Result<Option<UserProfile>, BackendError> {
        self.get(&format!("/profiles/{}", principal.as_str())).await
    }

    async fn get_caller_user_role(&self, caller: &Principal) -> Result<UserRole, BackendError> {
        self.get_as(caller, "/role").await
    }

    async fn is_caller_admin(&self, caller: &Principal) -> Result<bool, BackendError> {
        Ok(self.get_caller_user_role(caller).await? == UserRole::Admin)
    }

    async fn assign_user_role(
        &self,
        caller: &Principal,
        target: &Principal,
        role: UserRole,
    ) -> Result<(), BackendError> {
        self.post_unit(
            Some(caller),
            "/roles",
            &json!({
                "principal": target,
                "role": role,
            }),
        )
        .await
    }
}
