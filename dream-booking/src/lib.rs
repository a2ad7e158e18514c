pub mod booking;
pub mod contact;

pub use booking::{
    BookingDetails, BookingError, BookingForm, BookingFormError, BookingWorkflow,
};
pub use contact::{ContactError, ContactForm, ContactWorkflow, FieldError};
