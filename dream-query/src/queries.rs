use std::sync::Arc;

use dream_core::{
    BackendApi, BackendError, Booking, ContactInquiry, Destination, Principal, TransportOption,
};

use crate::cache::{QueryCache, QueryKey};

/// Typed read surface over the backend, one function per cached query.
///
/// Every read goes through the shared [`QueryCache`], so all pages observe
/// the same entry per key and a mutation only has to mark the right prefixes
/// stale to propagate.
#[derive(Clone)]
pub struct Queries {
    backend: Arc<dyn BackendApi>,
    cache: Arc<QueryCache>,
}

impl Queries {
    pub fn new(backend: Arc<dyn BackendApi>, cache: Arc<QueryCache>) -> Self {
        Self { backend, cache }
    }

    pub fn backend(&self) -> &Arc<dyn BackendApi> {
        &self.backend
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn destinations_key() -> QueryKey {
        QueryKey::new(["destinations"])
    }

    pub fn destination_key(id: u64) -> QueryKey {
        QueryKey::new(["destination".to_string(), id.to_string()])
    }

    pub fn transport_options_key(destination_id: u64) -> QueryKey {
        QueryKey::new(["transportOptions".to_string(), destination_id.to_string()])
    }

    pub fn transport_option_key(id: u64) -> QueryKey {
        QueryKey::new(["transportOption".to_string(), id.to_string()])
    }

    pub fn my_bookings_key(caller: &Principal) -> QueryKey {
        QueryKey::new(["myBookings".to_string(), caller.to_string()])
    }

    pub fn contact_inquiries_key() -> QueryKey {
        QueryKey::new(["contactInquiries"])
    }

    pub async fn destinations(&self) -> Result<Vec<Destination>, BackendError> {
        let backend = Arc::clone(&self.backend);
        self.cache
            .get_or_fetch(Self::destinations_key(), move || {
                let backend = Arc::clone(&backend);
                async move { backend.get_destinations().await }
            })
            .await
    }

    pub async fn destination_by_id(&self, id: u64) -> Result<Destination, BackendError> {
        let backend = Arc::clone(&self.backend);
        self.cache
            .get_or_fetch(Self::destination_key(id), move || {
                let backend = Arc::clone(&backend);
                async move { backend.get_destination_by_id(id).await }
            })
            .await
    }

    pub async fn transport_options_by_destination(
        &self,
        destination_id: u64,
    ) -> Result<Vec<TransportOption>, BackendError> {
        let backend = Arc::clone(&self.backend);
        self.cache
            .get_or_fetch(Self::transport_options_key(destination_id), move || {
                let backend = Arc::clone(&backend);
                async move {
                    backend
                        .get_transport_options_by_destination(destination_id)
                        .await
                }
            })
            .await
    }

    /// Callers are expected to skip the lookup entirely for the sentinel
    /// id 0 (no option selected).
    pub async fn transport_option_by_id(&self, id: u64) -> Result<TransportOption, BackendError> {
        let backend = Arc::clone(&self.backend);
        self.cache
            .get_or_fetch(Self::transport_option_key(id), move || {
                let backend = Arc::clone(&backend);
                async move { backend.get_transport_option_by_id(id).await }
            })
            .await
    }

    /// The caller's booking history, newest first.
    pub async fn my_bookings(&self, caller: &Principal) -> Result<Vec<Booking>, BackendError> {
        let backend = Arc::clone(&self.backend);
        let caller = caller.clone();
        self.cache
            .get_or_fetch(Self::my_bookings_key(&caller), move || {
                let backend = Arc::clone(&backend);
                let caller = caller.clone();
                async move {
                    let mut bookings = backend.get_bookings_by_caller(&caller).await?;
                    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                    Ok(bookings)
                }
            })
            .await
    }

    pub async fn contact_inquiries(&self) -> Result<Vec<ContactInquiry>, BackendError> {
        let backend = Arc::clone(&self.backend);
        self.cache
            .get_or_fetch(Self::contact_inquiries_key(), move || {
                let backend = Arc::clone(&backend);
                async move { backend.get_all_contact_inquiries().await }
            })
            .await
    }

    /// A created booking changes the caller's history and the affected
    /// option's seat count, so all three prefixes go stale together.
    pub fn invalidate_after_booking(&self, transport_option_id: u64) {
        self.cache.invalidate_prefix(&["myBookings"]);
        self.cache.invalidate_prefix(&["transportOptions"]);
        let id = transport_option_id.to_string();
        self.cache.invalidate_prefix(&["transportOption", id.as_str()]);
    }

    pub fn invalidate_after_contact(&self) {
        self.cache.invalidate_prefix(&["contactInquiries"]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use dream_core::{BookingType, TransportType};

    fn queries_over(backend: Arc<MemoryBackend>) -> Queries {
        Queries::new(backend, Arc::new(QueryCache::new()))
    }

    #[tokio::test]
    async fn my_bookings_come_back_newest_first() {
        let backend = Arc::new(MemoryBackend::new());
        let caller = Principal::from("did:web:example:alice");
        let option_id = backend.seed_transport_option(1, TransportType::Flight, "Daily", 10);
        for created_at in [100, 300, 200] {
            backend
                .create_booking(&caller, BookingType::Flight, "{}", created_at, option_id)
                .await
                .unwrap();
        }

        let queries = queries_over(backend);
        let bookings = queries.my_bookings(&caller).await.unwrap();
        let stamps: Vec<i64> = bookings.iter().map(|b| b.created_at).collect();
        assert_eq!(stamps, vec![300, 200, 100]);
    }

    #[tokio::test]
    async fn booking_invalidation_marks_all_dependent_keys() {
        let backend = Arc::new(MemoryBackend::new());
        let caller = Principal::from("did:web:example:alice");
        let option_id = backend.seed_transport_option(1, TransportType::Train, "Hourly", 5);

        let queries = queries_over(Arc::clone(&backend));
        queries.my_bookings(&caller).await.unwrap();
        queries.transport_options_by_destination(1).await.unwrap();
        queries.transport_option_by_id(option_id).await.unwrap();

        queries.invalidate_after_booking(option_id);

        let cache = queries.cache();
        assert_eq!(cache.is_stale(&Queries::my_bookings_key(&caller)), Some(true));
        assert_eq!(cache.is_stale(&Queries::transport_options_key(1)), Some(true));
        assert_eq!(
            cache.is_stale(&Queries::transport_option_key(option_id)),
            Some(true)
        );
    }

    #[tokio::test]
    async fn reads_are_cached_until_invalidated() {
        let backend = Arc::new(MemoryBackend::new());
        let queries = queries_over(Arc::clone(&backend));

        queries.destinations().await.unwrap();
        queries.destinations().await.unwrap();
        assert_eq!(backend.call_count("get_destinations"), 1);

        queries.cache().invalidate_prefix(&["destinations"]);
        queries.destinations().await.unwrap();
        assert_eq!(backend.call_count("get_destinations"), 2);
    }
}
