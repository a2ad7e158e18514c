use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dream_core::BackendError;
use dream_query::Queries;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// One failed field check. Validation collects every failure in one pass so
/// the form can flag all fields at once instead of drip-feeding errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("contact form validation failed")]
    Invalid(Vec<FieldError>),

    #[error("Failed to send your message. Please try again later.")]
    Submit(#[source] BackendError),
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("email regex: {e}"))
    })
}

/// Validate the contact form, returning the trimmed values or every field
/// error found.
pub fn validate(form: &ContactForm) -> Result<ContactForm, Vec<FieldError>> {
    let name = form.name.trim();
    let email = form.email.trim();
    let message = form.message.trim();

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !email_re().is_match(email) {
        errors.push(FieldError::new("email", "Please enter a valid email address"));
    }
    if message.is_empty() {
        errors.push(FieldError::new("message", "Message is required"));
    } else if message.chars().count() < 10 {
        errors.push(FieldError::new(
            "message",
            "Message must be at least 10 characters",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ContactForm {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    })
}

/// Contact inquiry submission. Inquiries are anonymous; only the admin list
/// view reads them back, which is why a successful submit invalidates the
/// `contactInquiries` cache entry.
pub struct ContactWorkflow {
    queries: Queries,
}

impl ContactWorkflow {
    pub fn new(queries: Queries) -> Self {
        Self { queries }
    }

    pub async fn submit(&self, form: &ContactForm) -> Result<(), ContactError> {
        let form = validate(form).map_err(ContactError::Invalid)?;
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        self.queries
            .backend()
            .submit_contact_inquiry(&form.name, &form.email, &form.message, timestamp)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "contact inquiry submission failed");
                ContactError::Submit(err)
            })?;

        tracing::info!(email = %form.email, "contact inquiry submitted");
        self.queries.invalidate_after_contact();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dream_core::BackendApi;
    use dream_query::{MemoryBackend, QueryCache};
    use std::sync::Arc;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn all_field_errors_are_collected_in_one_pass() {
        let errors = validate(&form("", "not-an-email", "short")).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
        assert_eq!(errors[0].message, "Name is required");
        assert_eq!(errors[1].message, "Please enter a valid email address");
        assert_eq!(errors[2].message, "Message must be at least 10 characters");
    }

    #[test]
    fn empty_email_and_message_report_required_not_format() {
        let errors = validate(&form("Ada", "  ", "")).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("email", "Email is required"),
                FieldError::new("message", "Message is required"),
            ]
        );
    }

    #[test]
    fn email_shape_is_checked() {
        for bad in ["plain", "a@b", "a@b.", "@b.co", "a b@c.co", "a@b c.co"] {
            let errors = validate(&form("Ada", bad, "long enough message")).unwrap_err();
            assert_eq!(errors[0].field, "email", "input {bad:?}");
        }
        assert!(validate(&form("Ada", "a@b.co", "long enough message")).is_ok());
        assert!(validate(&form("Ada", "first.last@sub.example.org", "long enough message")).is_ok());
    }

    #[test]
    fn message_boundary_is_ten_trimmed_characters() {
        // Nine characters plus padding still fails.
        let errors = validate(&form("Ada", "a@b.co", "  123456789  ")).unwrap_err();
        assert_eq!(errors[0].message, "Message must be at least 10 characters");
        // Exactly ten passes.
        assert!(validate(&form("Ada", "a@b.co", "1234567890")).is_ok());
    }

    #[tokio::test]
    async fn successful_submit_invalidates_the_inquiry_list() {
        let backend = Arc::new(MemoryBackend::new());
        let queries = Queries::new(
            Arc::clone(&backend) as Arc<dyn BackendApi>,
            Arc::new(QueryCache::new()),
        );
        queries.contact_inquiries().await.unwrap();

        let workflow = ContactWorkflow::new(queries.clone());
        workflow
            .submit(&form("Ada", "ada@example.org", "I would like to visit Kyoto."))
            .await
            .unwrap();

        assert_eq!(
            queries.cache().is_stale(&Queries::contact_inquiries_key()),
            Some(true)
        );
        assert_eq!(backend.call_count("submit_contact_inquiry"), 1);

        let stored = backend.get_all_contact_inquiries().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].email, "ada@example.org");
        assert!(stored[0].timestamp > 0);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let queries = Queries::new(
            Arc::clone(&backend) as Arc<dyn BackendApi>,
            Arc::new(QueryCache::new()),
        );
        let workflow = ContactWorkflow::new(queries);

        let err = workflow.submit(&form("", "", "")).await.unwrap_err();
        match err {
            ContactError::Invalid(errors) => assert_eq!(errors.len(), 3),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(backend.call_count("submit_contact_inquiry"), 0);
    }
}
