use ukaddr_core::BuildingType;

/// One hand-maintained address in the offline fallback table.
#[derive(Debug, Clone, Copy)]
pub struct UkAddressRecord {
    pub id: &'static str,
    pub line1: &'static str,
    pub line2: Option<&'static str>,
    pub city: &'static str,
    pub county: &'static str,
    pub postcode: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub building_type: BuildingType,
    pub confidence: f64,
}

const HAMILTON: (f64, f64) = (55.7772, -4.0390);
const VICTORIA: (f64, f64) = (51.4952, -0.1441);

pub static RECORDS: &[UkAddressRecord] = &[
    UkAddressRecord {
        id: "ukdb-ml3-0hs-1",
        line1: "1 Barrack Street",
        line2: Some("Office 2.18"),
        city: "Hamilton",
        county: "South Lanarkshire",
        postcode: "ML3 0HS",
        lat: HAMILTON.0,
        lng: HAMILTON.1,
        building_type: BuildingType::Commercial,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-ml3-0hs-3",
        line1: "3 Barrack Street",
        line2: None,
        city: "Hamilton",
        county: "South Lanarkshire",
        postcode: "ML3 0HS",
        lat: HAMILTON.0,
        lng: HAMILTON.1,
        building_type: BuildingType::House,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-ml3-0hs-5",
        line1: "5 Barrack Street",
        line2: None,
        city: "Hamilton",
        county: "South Lanarkshire",
        postcode: "ML3 0HS",
        lat: HAMILTON.0,
        lng: HAMILTON.1,
        building_type: BuildingType::House,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-ml3-0hs-7-1",
        line1: "Flat 1",
        line2: Some("7 Barrack Street"),
        city: "Hamilton",
        county: "South Lanarkshire",
        postcode: "ML3 0HS",
        lat: HAMILTON.0,
        lng: HAMILTON.1,
        building_type: BuildingType::Flat,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-ml3-0hs-bc",
        line1: "Barrack Street Business Centre",
        line2: Some("Barrack Street"),
        city: "Hamilton",
        county: "South Lanarkshire",
        postcode: "ML3 0HS",
        lat: HAMILTON.0,
        lng: HAMILTON.1,
        building_type: BuildingType::Commercial,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-sw1w-0ra-1",
        line1: "1 Buckingham Palace Road",
        line2: None,
        city: "London",
        county: "Greater London",
        postcode: "SW1W 0RA",
        lat: VICTORIA.0,
        lng: VICTORIA.1,
        building_type: BuildingType::House,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-sw1w-9sr-123",
        line1: "123 Buckingham Palace Road",
        line2: None,
        city: "London",
        county: "Greater London",
        postcode: "SW1W 9SR",
        lat: 51.4935,
        lng: -0.1468,
        building_type: BuildingType::Commercial,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-sw1a-1aa",
        line1: "Buckingham Palace",
        line2: Some("The Mall"),
        city: "London",
        county: "Greater London",
        postcode: "SW1A 1AA",
        lat: 51.5014,
        lng: -0.1419,
        building_type: BuildingType::Other,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-g1-1xq",
        line1: "George Square",
        line2: Some("City Chambers"),
        city: "Glasgow",
        county: "Glasgow City",
        postcode: "G1 1XQ",
        lat: 55.8611,
        lng: -4.2497,
        building_type: BuildingType::Commercial,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-eh1-2ng",
        line1: "Edinburgh Castle",
        line2: Some("Castlehill"),
        city: "Edinburgh",
        county: "City of Edinburgh",
        postcode: "EH1 2NG",
        lat: 55.9486,
        lng: -3.1999,
        building_type: BuildingType::Other,
        confidence: 0.95,
    },
    UkAddressRecord {
        id: "ukdb-m2-5db",
        line1: "Manchester Town Hall",
        line2: Some("Albert Square"),
        city: "Manchester",
        county: "Greater Manchester",
        postcode: "M2 5DB",
        lat: 53.4794,
        lng: -2.2453,
        building_type: BuildingType::Commercial,
        confidence: 0.95,
    },
];
