use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Principal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiableCredential {
    pub id: String,
    pub issuer: String,
    pub issuance_date: String,
    pub credential_subject: serde_json::Value,
    pub proof: serde_json::Value,
}

/// A signed presentation from the decentralized identity provider,
/// e.g. did:web:dreamdestination.example:alice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DidPresentation {
    pub did: String,
    #[serde(default)]
    pub credentials: Vec<VerifiableCredential>,
    pub proof: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid identity presentation: {0}")]
    InvalidPresentation(String),

    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Verifies a DID presentation and yields the authenticated principal.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn verify_presentation(
        &self,
        presentation: &DidPresentation,
    ) -> Result<Principal, IdentityError>;
}

/// Resolver that accepts any structurally valid presentation. A real
/// deployment would resolve the DID document, check the proof signature and
/// validate each credential.
pub struct MockIdResolver;

#[async_trait]
impl IdentityResolver for MockIdResolver {
    async fn verify_presentation(
        &self,
        presentation: &DidPresentation,
    ) -> Result<Principal, IdentityError> {
        if !presentation.did.starts_with("did:") {
            return Err(IdentityError::InvalidPresentation(format!(
                "not a DID: {}",
                presentation.did
            )));
        }

        tracing::info!("Verified identity presentation for DID: {}", presentation.did);

        Ok(Principal(presentation.did.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presentation(did: &str) -> DidPresentation {
        DidPresentation {
            did: did.to_string(),
            credentials: vec![],
            proof: serde_json::json!({"type": "mock"}),
        }
    }

    #[tokio::test]
    async fn mock_resolver_accepts_well_formed_dids() {
        let resolver = MockIdResolver;
        let principal = resolver
            .verify_presentation(&presentation("did:web:example:alice"))
            .await
            .unwrap();
        assert_eq!(principal.as_str(), "did:web:example:alice");
    }

    #[tokio::test]
    async fn mock_resolver_rejects_non_dids() {
        let resolver = MockIdResolver;
        let err = resolver
            .verify_presentation(&presentation("alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidPresentation(_)));
    }
}
