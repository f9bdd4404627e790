//! Amadeus wire types and canonical mapping
//!
//! Raw provider JSON is decoded once here, at the client boundary; only the
//! canonical model crosses into the aggregation facade.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use voyagr_domain::{
    CabinClass, FlightOffer, FlightPoint, FlightSegment, OfferPrice, SearchRequest,
};

// =============================================================================
// Request payload
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffersRequest {
    pub origin_destinations: Vec<OriginDestination>,
    pub travelers: Vec<Traveler>,
    pub sources: Vec<String>,
    pub search_criteria: SearchCriteria,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginDestination {
    pub id: String,
    pub origin_location_code: String,
    pub destination_location_code: String,
    pub departure_date_time_range: DateTimeRange,
}

#[derive(Debug, Serialize)]
pub struct DateTimeRange {
    pub date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Traveler {
    pub id: String,
    pub traveler_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub flight_filters: FlightFilters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightFilters {
    pub cabin_restrictions: Vec<CabinRestriction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_restriction: Option<ConnectionRestriction>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinRestriction {
    pub cabin: String,
    pub coverage: String,
    pub origin_destination_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRestriction {
    pub max_number_of_connections: u32,
}

/// Map the canonical cabin enum to Amadeus vocabulary. Pure and
/// independently testable.
pub fn cabin_param(cabin: CabinClass) -> &'static str {
    match cabin {
        CabinClass::Economy => "ECONOMY",
        CabinClass::PremiumEconomy => "PREMIUM_ECONOMY",
        CabinClass::Business => "BUSINESS",
        CabinClass::First => "FIRST",
    }
}

/// Build the provider payload from a canonical request: one leg per
/// direction in order (outbound then return), exactly one ADULT traveler
/// entry per passenger.
pub fn build_request(request: &SearchRequest) -> FlightOffersRequest {
    let mut origin_destinations = vec![OriginDestination {
        id: "1".to_string(),
        origin_location_code: request.origin.clone(),
        destination_location_code: request.destination.clone(),
        departure_date_time_range: DateTimeRange { date: request.departure_date.to_string() },
    }];

    if let Some(return_date) = request.return_date {
        origin_destinations.push(OriginDestination {
            id: "2".to_string(),
            origin_location_code: request.destination.clone(),
            destination_location_code: request.origin.clone(),
            departure_date_time_range: DateTimeRange { date: return_date.to_string() },
        });
    }

    let leg_ids: Vec<String> = origin_destinations.iter().map(|od| od.id.clone()).collect();

    let travelers = (1..=request.passengers)
        .map(|i| Traveler { id: i.to_string(), traveler_type: "ADULT".to_string() })
        .collect();

    FlightOffersRequest {
        origin_destinations,
        travelers,
        sources: vec!["GDS".to_string()],
        // The result cap is applied after mapping, never forwarded upstream:
        // a pre-capped provider response could not backfill offers that
        // mapping later drops.
        search_criteria: SearchCriteria {
            flight_filters: FlightFilters {
                cabin_restrictions: vec![CabinRestriction {
                    cabin: cabin_param(request.cabin).to_string(),
                    coverage: "MOST_SEGMENTS".to_string(),
                    origin_destination_ids: leg_ids,
                }],
                connection_restriction: request
                    .max_connections
                    .map(|max| ConnectionRestriction { max_number_of_connections: max }),
            },
        },
    }
}

// =============================================================================
// Response payload
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct FlightOffersResponse {
    #[serde(default)]
    pub data: Vec<RawOffer>,
    #[serde(default)]
    pub dictionaries: Option<Dictionaries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOffer {
    pub id: String,
    pub itineraries: Vec<RawItinerary>,
    pub price: RawPrice,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawItinerary {
    #[serde(default)]
    pub duration: Option<String>,
    pub segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    pub departure: RawEndpoint,
    pub arrival: RawEndpoint,
    pub carrier_code: String,
    pub number: String,
    #[serde(default)]
    pub aircraft: Option<RawAircraft>,
    #[serde(default)]
    pub co2_emissions: Option<Vec<RawCo2Emission>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEndpoint {
    pub iata_code: String,
    #[serde(default)]
    pub terminal: Option<String>,
    pub at: String,
}

#[derive(Debug, Deserialize)]
pub struct RawAircraft {
    pub code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCo2Emission {
    pub weight: f64,
    #[serde(default)]
    pub weight_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawPrice {
    pub total: String,
    #[serde(default)]
    pub base: Option<String>,
    pub currency: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Dictionaries {
    #[serde(default)]
    pub carriers: HashMap<String, String>,
    #[serde(default)]
    pub aircraft: HashMap<String, String>,
}

/// Map one raw offer into the canonical model. Optional fields (terminal,
/// aircraft name, emissions) stay absent rather than failing the offer;
/// an offer with no segments maps to `None` and is skipped.
pub fn map_offer(raw: RawOffer, dictionaries: &Dictionaries) -> Option<FlightOffer> {
    let mut segments = Vec::new();
    let mut emissions_total = 0.0_f64;
    let mut has_emissions = false;

    for itinerary in &raw.itineraries {
        for segment in &itinerary.segments {
            if let Some(entries) = &segment.co2_emissions {
                for entry in entries {
                    emissions_total += entry.weight;
                    has_emissions = true;
                }
            }

            segments.push(FlightSegment {
                carrier_code: segment.carrier_code.clone(),
                flight_number: segment.number.clone(),
                departure: FlightPoint {
                    airport: segment.departure.iata_code.clone(),
                    at: segment.departure.at.clone(),
                    terminal: segment.departure.terminal.clone(),
                },
                arrival: FlightPoint {
                    airport: segment.arrival.iata_code.clone(),
                    at: segment.arrival.at.clone(),
                    terminal: segment.arrival.terminal.clone(),
                },
                aircraft: segment
                    .aircraft
                    .as_ref()
                    .map(|a| dictionaries.aircraft.get(&a.code).cloned().unwrap_or_else(|| a.code.clone())),
            });
        }
    }

    let carrier_code = raw
        .validating_airline_codes
        .first()
        .cloned()
        .or_else(|| segments.first().map(|s| s.carrier_code.clone()))?;
    let airline =
        dictionaries.carriers.get(&carrier_code).cloned().unwrap_or(carrier_code);

    // A total duration only makes sense for a single itinerary; round trips
    // carry per-leg durations the canonical model does not model.
    let duration = match raw.itineraries.as_slice() {
        [only] => only.duration.clone(),
        _ => None,
    };

    FlightOffer::from_segments(
        raw.id,
        airline,
        OfferPrice { total: raw.price.total, base: raw.price.base, currency: raw.price.currency },
        duration,
        segments,
        has_emissions.then_some(emissions_total),
    )
}
