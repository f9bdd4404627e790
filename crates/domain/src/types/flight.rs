//! Flight search request and canonical offer model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, VoyagrError};

/// Passenger service tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    /// Normalize free-form caller input ("Premium Economy", "BUSINESS_CLASS",
    /// "first class") into the enum. Callers run this before constructing a
    /// [`SearchRequest`].
    pub fn parse(input: &str) -> Option<Self> {
        let normalized: String = input
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '-' || c == '_' || c == ' ' { ' ' } else { c })
            .collect();

        match normalized.as_str() {
            "economy" | "coach" => Some(Self::Economy),
            "premium economy" | "premium" => Some(Self::PremiumEconomy),
            "business" | "business class" => Some(Self::Business),
            "first" | "first class" => Some(Self::First),
            _ => None,
        }
    }
}

impl std::str::FromStr for CabinClass {
    type Err = VoyagrError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| VoyagrError::InvalidInput(format!("unknown cabin class: {s}")))
    }
}

impl std::fmt::Display for CabinClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Economy => "economy",
            Self::PremiumEconomy => "premium_economy",
            Self::Business => "business",
            Self::First => "first",
        };
        write!(f, "{label}")
    }
}

/// Canonical, provider-agnostic flight search input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Origin IATA location code (e.g. "FRA").
    pub origin: String,
    /// Destination IATA location code (e.g. "JFK").
    pub destination: String,
    pub departure_date: NaiveDate,
    /// Present for round trips; the return leg flies destination → origin.
    pub return_date: Option<NaiveDate>,
    pub cabin: CabinClass,
    pub passengers: u32,
    pub max_connections: Option<u32>,
    /// Cap applied by the facade after mapping, not by providers before.
    pub max_results: Option<usize>,
}

impl SearchRequest {
    pub fn one_way(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: NaiveDate,
        cabin: CabinClass,
        passengers: u32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_date,
            return_date: None,
            cabin,
            passengers,
            max_connections: None,
            max_results: None,
        }
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }

    /// Validate invariants before fanning out to providers.
    pub fn validate(&self) -> Result<()> {
        if self.passengers == 0 {
            return Err(VoyagrError::InvalidInput("passenger count must be at least 1".into()));
        }

        validate_iata(&self.origin, "origin")?;
        validate_iata(&self.destination, "destination")?;

        if self.origin.eq_ignore_ascii_case(&self.destination) {
            return Err(VoyagrError::InvalidInput(
                "origin and destination must be different".into(),
            ));
        }

        if let Some(return_date) = self.return_date {
            if return_date < self.departure_date {
                return Err(VoyagrError::InvalidInput(
                    "return date cannot be before departure date".into(),
                ));
            }
        }

        Ok(())
    }
}

fn validate_iata(code: &str, field: &str) -> Result<()> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(VoyagrError::InvalidInput(format!("{field} must be a 3-letter IATA code: {code}")))
    }
}

/// One endpoint of a flight: airport, local wall-clock time, terminal.
///
/// Times stay ISO local strings; provider payloads carry no zone info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightPoint {
    pub airport: String,
    pub at: String,
    pub terminal: Option<String>,
}

/// One operated flight within an itinerary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSegment {
    pub carrier_code: String,
    pub flight_number: String,
    pub departure: FlightPoint,
    pub arrival: FlightPoint,
    pub aircraft: Option<String>,
}

/// Provider-formatted price. Totals stay strings; this layer does no
/// decimal arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferPrice {
    pub total: String,
    pub base: Option<String>,
    pub currency: String,
}

/// One bookable itinerary option, transient: constructed fresh per search,
/// never persisted, owned by the caller that receives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Opaque provider-assigned id.
    pub id: String,
    /// Carrier display name.
    pub airline: String,
    pub price: OfferPrice,
    pub departure: FlightPoint,
    pub arrival: FlightPoint,
    /// Total duration, ISO 8601 (e.g. "PT8H25M") where the provider supplies
    /// one.
    pub duration: Option<String>,
    pub stops: usize,
    /// Chronologically ordered, never empty; `stops == segments.len() - 1`.
    pub segments: Vec<FlightSegment>,
    pub emissions_kg: Option<f64>,
}

impl FlightOffer {
    /// Build an offer from its ordered segments, deriving endpoints and the
    /// stop count from the segment list so the invariant holds by
    /// construction. Returns `None` for an empty segment list.
    #[allow(clippy::too_many_arguments)]
    pub fn from_segments(
        id: String,
        airline: String,
        price: OfferPrice,
        duration: Option<String>,
        segments: Vec<FlightSegment>,
        emissions_kg: Option<f64>,
    ) -> Option<Self> {
        let first = segments.first()?;
        let last = segments.last()?;

        Some(Self {
            id,
            airline,
            price,
            departure: first.departure.clone(),
            arrival: last.arrival.clone(),
            duration,
            stops: segments.len() - 1,
            segments,
            emissions_kg,
        })
    }
}
