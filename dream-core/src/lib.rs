pub mod backend;
pub mod error;
pub mod identity;
pub mod models;

pub use backend::BackendApi;
pub use error::BackendError;
pub use identity::{
    DidPresentation, IdentityError, IdentityResolver, MockIdResolver, VerifiableCredential,
};
pub use models::{
    Booking, BookingType, ContactInquiry, Destination, Principal, TransportOption, TransportType,
    UserProfile, UserRole,
};
