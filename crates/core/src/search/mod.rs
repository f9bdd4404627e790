//! Flight search aggregation

pub mod ports;
pub mod service;

pub use ports::FlightProvider;
pub use service::SearchService;
