use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use dream_core::{
    BackendApi, BackendError, Booking, BookingType, ContactInquiry, Destination, Principal,
    TransportOption, TransportType, UserProfile, UserRole,
};

#[derive(Default)]
struct Inner {
    destinations: Vec<Destination>,
    options: HashMap<u64, TransportOption>,
    bookings: Vec<Booking>,
    inquiries: Vec<ContactInquiry>,
    profiles: HashMap<Principal, UserProfile>,
    roles: HashMap<Principal, UserRole>,
    next_booking_id: u64,
    next_option_id: u64,
}

/// In-memory [`BackendApi`] used for tests and local runs.
///
/// Enforces the same booking rules the live backend enforces (option must
/// exist, seats must remain, booking type must match) so workflows can be
/// exercised end to end. Per-operation call counts double as a test spy.
pub struct MemoryBackend {
    inner: Mutex<Inner>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_booking_id: 1,
                next_option_id: 1,
                ..Inner::default()
            }),
            calls: Mutex::new(HashMap::new()),
        }
    }

    fn record(&self, op: &'static str) {
        *self.calls.lock().unwrap().entry(op).or_insert(0) += 1;
    }

    /// Number of times the named operation has been invoked.
    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    pub fn seed_destination(&self, destination: Destination) {
        self.inner.lock().unwrap().destinations.push(destination);
    }

    /// Seed a transport option, returning its id.
    pub fn seed_transport_option(
        &self,
        destination_id: u64,
        transport_type: TransportType,
        schedule: &str,
        available_seats: u64,
    ) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_option_id;
        inner.next_option_id += 1;
        inner.options.insert(
            id,
            TransportOption {
                id,
                destination_id,
                transport_type,
                schedule: schedule.to_string(),
                available_seats,
            },
        );
        id
    }

    pub fn set_role(&self, principal: Principal, role: UserRole) {
        self.inner.lock().unwrap().roles.insert(principal, role);
    }

    /// A small demo catalog for local runs without a live backend.
    pub fn seed_demo(&self) {
        self.seed_destination(Destination {
            id: 1,
            name: "Santorini".to_string(),
            city: "Thira".to_string(),
            country: "Greece".to_string(),
            description: "Whitewashed villages above a volcanic caldera.".to_string(),
            latitude: 36.3932,
            longitude: 25.4615,
        });
        self.seed_destination(Destination {
            id: 2,
            name: "Kyoto".to_string(),
            city: "Kyoto".to_string(),
            country: "Japan".to_string(),
            description: "Temples, gardens and the old imperial capital.".to_string(),
            latitude: 35.0116,
            longitude: 135.7681,
        });
        self.seed_transport_option(1, TransportType::Flight, "Daily 09:15 from ATH", 24);
        self.seed_transport_option(1, TransportType::Flight, "Mon/Thu 14:40 from ATH", 8);
        self.seed_transport_option(2, TransportType::Train, "Hourly Shinkansen from Tokyo", 120);
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendApi for MemoryBackend {
    async fn get_destinations(&self) -> Result<Vec<Destination>, BackendError> {
        self.record("get_destinations");
        Ok(self.inner.lock().unwrap().destinations.clone())
    }

    async fn get_destination_by_id(&self, id: u64) -> Result<Destination, BackendError> {
        self.record("get_destination_by_id");
        self.inner
            .lock()
            .unwrap()
            .destinations
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound("Destination".to_string()))
    }

    async fn get_transport_options_by_destination(
        &self,
        destination_id: u64,
    ) -> Result<Vec<TransportOption>, BackendError> {
        self.record("get_transport_options_by_destination");
        let mut options: Vec<TransportOption> = self
            .inner
            .lock()
            .unwrap()
            .options
            .values()
            .filter(|o| o.destination_id == destination_id)
            .cloned()
            .collect();
        options.sort_by_key(|o| o.id);
        Ok(options)
    }

    async fn get_transport_option_by_id(&self, id: u64) -> Result<TransportOption, BackendError> {
        self.record("get_transport_option_by_id");
        self.inner
            .lock()
            .unwrap()
            .options
            .get(&id)
            .cloned()
            .ok_or(BackendError::OptionNotFound)
    }

    async fn add_transport_option(
        &self,
        caller: &Principal,
        destination_id: u64,
        transport_type: TransportType,
        schedule: &str,
        available_seats: u64,
    ) -> Result<u64, BackendError> {
        self.record("add_transport_option");
        if !self.is_caller_admin(caller).await? {
            return Err(BackendError::Unauthorized);
        }
        Ok(self.seed_transport_option(destination_id, transport_type, schedule, available_seats))
    }

    async fn create_booking(
        &self,
        caller: &Principal,
        booking_type: BookingType,
        details: &str,
        created_at: i64,
        transport_option_id: u64,
    ) -> Result<u64, BackendError> {
        self.record("create_booking");
        let mut inner = self.inner.lock().unwrap();

        let option = inner
            .options
            .get_mut(&transport_option_id)
            .ok_or(BackendError::OptionNotFound)?;
        if option.available_seats == 0 {
            return Err(BackendError::NoSeats);
        }
        if !booking_type.matches(option.transport_type) {
            return Err(BackendError::TypeMismatch);
        }
        // The backend treats `details` as opaque, so it books one seat per
        // submission regardless of the passenger count encoded inside.
        option.available_seats -= 1;

        let id = inner.next_booking_id;
        inner.next_booking_id += 1;
        inner.bookings.push(Booking {
            id,
            user_id: caller.clone(),
            booking_type,
            details: details.to_string(),
            transport_option_id: Some(transport_option_id),
            created_at,
        });
        tracing::info!(booking_id = id, caller = %caller, "booking created");
        Ok(id)
    }

    async fn get_bookings_by_caller(
        &self,
        caller: &Principal,
    ) -> Result<Vec<Booking>, BackendError> {
        self.record("get_bookings_by_caller");
        Ok(self
            .inner
            .lock()
            .unwrap()
            .bookings
            .iter()
            .filter(|b| &b.user_id == caller)
            .cloned()
            .collect())
    }

    async fn get_booking_by_id(&self, booking_id: u64) -> Result<Booking, BackendError> {
        self.record("get_booking_by_id");
        self.inner
            .lock()
            .unwrap()
            .bookings
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound("Booking".to_string()))
    }

    async fn submit_contact_inquiry(
        &self,
        name: &str,
        email: &str,
        message: &str,
        timestamp: i64,
    ) -> Result<(), BackendError> {
        self.record("submit_contact_inquiry");
        self.inner.lock().unwrap().inquiries.push(ContactInquiry {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            timestamp,
        });
        Ok(())
    }

    async fn get_all_contact_inquiries(&self) -> Result<Vec<ContactInquiry>, BackendError> {
        self.record("get_all_contact_inquiries");
        Ok(self.inner.lock().unwrap().inquiries.clone())
    }

    async fn get_caller_user_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<UserProfile>, BackendError> {
        self.record("get_caller_user_profile");
        Ok(self.inner.lock().unwrap().profiles.get(caller).cloned())
    }

    async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: &UserProfile,
    ) -> Result<(), BackendError> {
        self.record("save_caller_user_profile");
        self.inner
            .lock()
            .unwrap()
            .profiles
            .insert(caller.clone(), profile.clone());
        Ok(())
    }

    async fn get_user_profile(
        &self,
        principal: &Principal,
    ) -> Result<Option<UserProfile>, BackendError> {
        self.record("get_user_profile");
        Ok(self.inner.lock().unwrap().profiles.get(principal).cloned())
    }

    async fn get_caller_user_role(&self, caller: &Principal) -> Result<UserRole, BackendError> {
        self.record("get_caller_user_role");
        Ok(self
            .inner
            .lock()
            .unwrap()
            .roles
            .get(caller)
            .copied()
            .unwrap_or(UserRole::User))
    }

    async fn is_caller_admin(&self, caller: &Principal) -> Result<bool, BackendError> {
        self.record("is_caller_admin");
        Ok(matches!(
            self.inner.lock().unwrap().roles.get(caller),
            Some(UserRole::Admin)
        ))
    }

    async fn assign_user_role(
        &self,
        caller: &Principal,
        target: &Principal,
        role: UserRole,
    ) -> Result<(), BackendError> {
        self.record("assign_user_role");
        if !self.is_caller_admin(caller).await? {
            return Err(BackendError::Unauthorized);
        }
        self.inner.lock().unwrap().roles.insert(target.clone(), role);
        Ok(())
    }
}
