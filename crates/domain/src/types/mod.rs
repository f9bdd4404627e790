//! Canonical travel models
//!
//! The single provider-agnostic shapes all external data is mapped into.
//! Provider wire formats never cross the infra boundary; these types are the
//! only currency between provider clients and the aggregation facade.

pub mod flight;
pub mod loyalty;
pub mod token;

pub use flight::{
    CabinClass, FlightOffer, FlightPoint, FlightSegment, OfferPrice, SearchRequest,
};
pub use loyalty::{BalanceUnit, LoyaltyAccount};
pub use token::CachedToken;
