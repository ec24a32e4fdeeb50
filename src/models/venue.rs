//! Venue information (a single object, not a list).

use serde::{Deserialize, Serialize};

use crate::db::StoredDocument;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransportInfo {
    pub car: String,
    pub train: String,
    pub plane: String,
    pub bus: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParkingInfo {
    pub onsite: bool,
    pub cost: String,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccommodationInfo {
    pub onsite: bool,
    pub nearby: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VenueInfo {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub accessibility: Vec<String>,
    #[serde(default)]
    pub transport: TransportInfo,
    #[serde(default)]
    pub parking: ParkingInfo,
    #[serde(default)]
    pub accommodation: AccommodationInfo,
    #[serde(default)]
    pub images: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl StoredDocument for VenueInfo {
    const KEY: &'static str = "venue";

    fn default_document() -> Self {
        VenueInfo {
            name: "Crowne Plaza Stratford upon Avon".to_string(),
            address: "Bridgefoot, Stratford-upon-Avon CV37 6YR, United Kingdom".to_string(),
            description: "A stunning riverside location in the heart of Shakespeare's country, offering modern conference facilities with historic charm.".to_string(),
            facilities: strings(&[
                "Free high-speed Wi-Fi throughout",
                "State-of-the-art audiovisual equipment",
                "Multiple conference rooms and breakout spaces",
                "On-site restaurant and bar",
                "24-hour front desk",
                "Business center",
                "Fitness center and spa",
                "Indoor swimming pool",
                "Complimentary tea and coffee stations",
                "Climate control in all meeting rooms",
            ]),
            accessibility: strings(&[
                "Wheelchair accessible throughout",
                "Accessible parking spaces available",
                "Accessible restrooms on all floors",
                "Hearing loop systems in main conference rooms",
                "Elevator access to all floors",
                "Assistance available upon request",
                "Braille signage in key areas",
                "Accessible accommodation rooms available",
            ]),
            transport: TransportInfo {
                car: "Located just off the M40 motorway, approximately 2 hours from London and 1 hour from Birmingham. Postcode CV37 6YR for satellite navigation.".to_string(),
                train: "Stratford-upon-Avon railway station is 0.5 miles away (10-minute walk). Direct services from Birmingham, London Marylebone, and Oxford.".to_string(),
                plane: "Birmingham Airport (BHX) is 25 miles away (40-minute drive). Heathrow Airport is 90 miles away (2-hour drive).".to_string(),
                bus: "Regular bus services from Warwick, Leamington Spa, and surrounding areas. Bus stop located 200 yards from the hotel.".to_string(),
            },
            parking: ParkingInfo {
                onsite: true,
                cost: "Free for conference delegates".to_string(),
                alternatives: strings(&[
                    "Stratford-upon-Avon Park & Ride (0.3 miles)",
                    "Bridge Street Car Park (0.2 miles)",
                    "Windsor Street Car Park (0.4 miles)",
                ]),
            },
            accommodation: AccommodationInfo {
                onsite: true,
                nearby: strings(&[
                    "Macdonald Alveston Manor Hotel (2 miles)",
                    "The Stratford Hotel (0.3 miles)",
                    "The Falcon Hotel (0.5 miles)",
                    "Ettington Park Hotel (5 miles)",
                ]),
            },
            images: Vec::new(),
        }
    }
}
