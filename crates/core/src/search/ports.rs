//! Flight provider port interface

use async_trait::async_trait;
use voyagr_domain::{FlightOffer, ProviderError, SearchRequest};

/// Trait for one flight-offer search provider.
///
/// Implementations classify every failure into a [`ProviderError`] at their
/// boundary; the aggregation facade decides what a failure means for the
/// combined result set. A provider returning zero offers is a normal,
/// successful empty list, never an error.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    /// Stable provider name used for logging and subset selection.
    fn name(&self) -> &'static str;

    /// Search this provider's inventory, returning canonical offers.
    async fn search(
        &self,
        request: &SearchRequest,
    ) -> std::result::Result<Vec<FlightOffer>, ProviderError>;
}
