//! Duffel wire types and canonical mapping

use serde::{Deserialize, Serialize};
use voyagr_domain::{
    CabinClass, FlightOffer, FlightPoint, FlightSegment, OfferPrice, SearchRequest,
};

// =============================================================================
// Request payload
// =============================================================================

#[derive(Debug, Serialize)]
pub struct OfferRequest {
    pub data: OfferRequestData,
}

#[derive(Debug, Serialize)]
pub struct OfferRequestData {
    pub slices: Vec<SliceRequest>,
    pub passengers: Vec<PassengerRequest>,
    pub cabin_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SliceRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
}

#[derive(Debug, Serialize)]
pub struct PassengerRequest {
    #[serde(rename = "type")]
    pub passenger_type: String,
}

/// Map the canonical cabin enum to Duffel vocabulary. Pure and
/// independently testable.
pub fn cabin_param(cabin: CabinClass) -> &'static str {
    match cabin {
        CabinClass::Economy => "economy",
        CabinClass::PremiumEconomy => "premium_economy",
        CabinClass::Business => "business",
        CabinClass::First => "first",
    }
}

/// Build the provider payload: ordered slices (outbound, then return flying
/// the reverse pairing) and exactly one adult passenger entry per traveler.
pub fn build_request(request: &SearchRequest) -> OfferRequest {
    let mut slices = vec![SliceRequest {
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        departure_date: request.departure_date.to_string(),
    }];

    if let Some(return_date) = request.return_date {
        slices.push(SliceRequest {
            origin: request.destination.clone(),
            destination: request.origin.clone(),
            departure_date: return_date.to_string(),
        });
    }

    let passengers = (0..request.passengers)
        .map(|_| PassengerRequest { passenger_type: "adult".to_string() })
        .collect();

    OfferRequest {
        data: OfferRequestData {
            slices,
            passengers,
            cabin_class: cabin_param(request.cabin).to_string(),
            max_connections: request.max_connections,
        },
    }
}

// =============================================================================
// Response payload
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OfferResponse {
    pub data: OfferResponseData,
}

#[derive(Debug, Deserialize)]
pub struct OfferResponseData {
    #[serde(default)]
    pub offers: Vec<RawOffer>,
}

#[derive(Debug, Deserialize)]
pub struct RawOffer {
    pub id: String,
    pub total_amount: String,
    pub total_currency: String,
    #[serde(default)]
    pub base_amount: Option<String>,
    #[serde(default)]
    pub total_emissions_kg: Option<String>,
    pub owner: RawOwner,
    pub slices: Vec<RawSlice>,
}

#[derive(Debug, Deserialize)]
pub struct RawOwner {
    pub name: String,
    #[serde(default)]
    pub iata_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSlice {
    #[serde(default)]
    pub duration: Option<String>,
    pub segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
pub struct RawSegment {
    pub origin: RawPlace,
    pub destination: RawPlace,
    pub departing_at: String,
    pub arriving_at: String,
    #[serde(default)]
    pub marketing_carrier: Option<RawCarrier>,
    #[serde(default)]
    pub marketing_carrier_flight_number: Option<String>,
    #[serde(default)]
    pub aircraft: Option<RawAircraft>,
    #[serde(default)]
    pub origin_terminal: Option<String>,
    #[serde(default)]
    pub destination_terminal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawPlace {
    pub iata_code: String,
}

#[derive(Debug, Deserialize)]
pub struct RawCarrier {
    #[serde(default)]
    pub iata_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAircraft {
    #[serde(default)]
    pub name: Option<String>,
}

/// Map one raw Duffel offer into the canonical model. Missing optional
/// fields stay absent; an offer with no segments maps to `None`.
pub fn map_offer(raw: RawOffer) -> Option<FlightOffer> {
    let mut segments = Vec::new();

    for slice in &raw.slices {
        for segment in &slice.segments {
            let carrier_code = segment
                .marketing_carrier
                .as_ref()
                .and_then(|c| c.iata_code.clone())
                .or_else(|| raw.owner.iata_code.clone())
                .unwrap_or_default();

            segments.push(FlightSegment {
                carrier_code,
                flight_number: segment
                    .marketing_carrier_flight_number
                    .clone()
                    .unwrap_or_default(),
                departure: FlightPoint {
                    airport: segment.origin.iata_code.clone(),
                    at: segment.departing_at.clone(),
                    terminal: segment.origin_terminal.clone(),
                },
                arrival: FlightPoint {
                    airport: segment.destination.iata_code.clone(),
                    at: segment.arriving_at.clone(),
                    terminal: segment.destination_terminal.clone(),
                },
                aircraft: segment.aircraft.as_ref().and_then(|a| a.name.clone()),
            });
        }
    }

    let duration = match raw.slices.as_slice() {
        [only] => only.duration.clone(),
        _ => None,
    };

    let emissions_kg = raw.total_emissions_kg.as_deref().and_then(|kg| kg.parse::<f64>().ok());

    FlightOffer::from_segments(
        raw.id,
        raw.owner.name,
        OfferPrice {
            total: raw.total_amount,
            base: raw.base_amount,
            currency: raw.total_currency,
        },
        duration,
        segments,
        emissions_kg,
    )
}
