use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use dream_booking::{ContactError, ContactForm, FieldError};

use crate::chrome::SiteChrome;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContactView {
    pub chrome: SiteChrome,
    pub title: &'static str,
    pub info_cards: Vec<InfoCard>,
    pub form: ContactForm,
}

#[derive(Debug, Serialize)]
pub struct InfoCard {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmitView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub field_errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
    /// Echoed back on failure so the visitor's draft survives.
    pub form: ContactForm,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/contact", get(contact_page).post(submit_contact))
}

async fn contact_page() -> Json<ContactView> {
    Json(ContactView {
        chrome: SiteChrome::standard(),
        title: "Get in Touch",
        info_cards: vec![
            InfoCard { title: "Email", body: "info@dreamdestination.com" },
            InfoCard { title: "Phone", body: "+1 (555) 123-4567" },
            InfoCard { title: "Office", body: "123 Travel Street, Adventure City, AC 12345" },
        ],
        form: ContactForm::default(),
    })
}

async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Json<ContactSubmitView> {
    match state.contact.submit(&form).await {
        Ok(()) => Json(ContactSubmitView {
            message: Some("Your message has been sent successfully. We'll get back to you soon!"),
            field_errors: Vec::new(),
            form_error: None,
            form: ContactForm::default(),
        }),
        Err(ContactError::Invalid(field_errors)) => Json(ContactSubmitView {
            message: None,
            field_errors,
            form_error: None,
            form,
        }),
        Err(err @ ContactError::Submit(_)) => Json(ContactSubmitView {
            message: None,
            field_errors: Vec::new(),
            form_error: Some(err.to_string()),
            form,
        }),
    }
}
