//! # Voyagr Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for providers and persistence
//! - The aggregation facade that fans one search out to all providers
//!
//! ## Architecture Principles
//! - Only depends on `voyagr-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod search;

// Infrastructure ports
pub mod loyalty_ports;
pub mod token_ports;

// Re-export specific items to avoid ambiguity
pub use loyalty_ports::{ConnectionInfo, LoyaltyGateway};
pub use search::ports::FlightProvider;
pub use search::SearchService;
pub use token_ports::TokenRepository;
