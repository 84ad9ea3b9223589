//! Correction client port interface

use async_trait::async_trait;

use crate::domain::correction::{CorrectionFailure, CorrectionRequest};

/// Port for a single remote correction attempt.
///
/// Implementations perform exactly one remote call and never retry.
/// Library-specific errors must be mapped into [`CorrectionFailure`]
/// before they leave the adapter.
#[async_trait]
pub trait Corrector: Send + Sync {
    /// Correct the request text.
    ///
    /// # Arguments
    /// * `request` - The non-empty text to correct
    /// * `credential` - API key used for this call only
    ///
    /// # Returns
    /// The corrected text or a classified failure
    async fn attempt(
        &self,
        request: &CorrectionRequest,
        credential: &str,
    ) -> Result<String, CorrectionFailure>;
}

#[async_trait]
impl Corrector for Box<dyn Corrector> {
    async fn attempt(
        &self,
        request: &CorrectionRequest,
        credential: &str,
    ) -> Result<String, CorrectionFailure> {
        self.as_ref().attempt(request, credential).await
    }
}
