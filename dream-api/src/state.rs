use std::sync::Arc;

use dream_booking::{BookingWorkflow, ContactWorkflow};
use dream_core::IdentityResolver;
use dream_query::Queries;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub queries: Queries,
    pub booking: Arc<BookingWorkflow>,
    pub contact: Arc<ContactWorkflow>,
    pub resolver: Arc<dyn IdentityResolver>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(queries: Queries, resolver: Arc<dyn IdentityResolver>, auth: AuthConfig) -> Self {
        Self {
            booking: Arc::new(BookingWorkflow::new(queries.clone())),
            contact: Arc::new(ContactWorkflow::new(queries.clone())),
            queries,
            resolver,
            auth,
        }
    }
}
