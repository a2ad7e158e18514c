use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::{
    Booking, BookingType, ContactInquiry, Destination, Principal, TransportOption, TransportType,
    UserProfile, UserRole,
};

/// The remote booking backend, consumed as an opaque asynchronous RPC
/// surface. All authoritative state (seat counts, booking ids, roles) lives
/// behind this trait; the service tier only mirrors it.
///
/// The backend has no session concept of its own, so every caller-scoped
/// operation takes the verified [`Principal`] explicitly.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn get_destinations(&self) -> Result<Vec<Destination>, BackendError>;

    async fn get_destination_by_id(&self, id: u64) -> Result<Destination, BackendError>;

    async fn get_transport_options_by_destination(
        &self,
        destination_id: u64,
    ) -> Result<Vec<TransportOption>, BackendError>;

    async fn get_transport_option_by_id(&self, id: u64) -> Result<TransportOption, BackendError>;

    /// Admin-only: register a new bookable slot for a destination. Returns
    /// the new option id.
    async fn add_transport_option(
        &self,
        caller: &Principal,
        destination_id: u64,
        transport_type: TransportType,
        schedule: &str,
        available_seats: u64,
    ) -> Result<u64, BackendError>;

    /// Create a booking. `details` is an opaque JSON blob the backend stores
    /// untouched; `created_at` is a client-generated nanosecond timestamp.
    ///
    /// Fails with [`BackendError::NoSeats`], [`BackendError::OptionNotFound`]
    /// or [`BackendError::TypeMismatch`].
    async fn create_booking(
        &self,
        caller: &Principal,
        booking_type: BookingType,
        details: &str,
        created_at: i64,
        transport_option_id: u64,
    ) -> Result<u64, BackendError>;

    async fn get_bookings_by_caller(
        &self,
        caller: &Principal,
    ) -> Result<Vec<Booking>, BackendError>;

    async fn get_booking_by_id(&self, booking_id: u64) -> Result<Booking, BackendError>;

    async fn submit_contact_inquiry(
        &self,
        name: &str,
        email: &str,
        message: &str,
        timestamp: i64,
    ) -> Result<(), BackendError>;

    async fn get_all_contact_inquiries(&self) -> Result<Vec<ContactInquiry>, BackendError>;

    async fn get_caller_user_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<UserProfile>, BackendError>;

    async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: &UserProfile,
    ) -> Result<(), BackendError>;

    async fn get_user_profile(
        &self,
        principal: &Principal,
    ) -> Result<Option<UserProfile>, BackendError>;

    async fn get_caller_user_role(&self, caller: &Principal) -> Result<UserRole, BackendError>;

    async fn is_caller_admin(&self, caller: &Principal) -> Result<bool, BackendError>;

    /// Admin-only: assign a role to another principal.
    async fn assign_user_role(
        &self,
        caller: &Principal,
        target: &Principal,
        role: UserRole,
    ) -> Result<(), BackendError>;
}
