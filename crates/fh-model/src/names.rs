//! Table and column names used across the pipeline.

/// Source table names.
pub mod tables {
    pub const AIRLINE: &str = "airline";
    pub const AIRPLANE: &str = "airplane";
    pub const AIRPLANE_TYPE: &str = "airplane_type";
    pub const AIRPORT: &str = "airport";
    pub const BOOKING: &str = "booking";
    pub const FLIGHT: &str = "flight";
    pub const PASSENGER_FEEDBACK: &str = "passenger_feedback";
}

/// Column names, raw and derived.
pub mod columns {
    // airline
    pub const AIRLINE_ID: &str = "airline_id";
    pub const IATA: &str = "iata";
    pub const AIRLINE_NAME: &str = "airline_name";
    pub const AIRLINE_TYPE: &str = "type";
    pub const BASE_AIRPORT: &str = "base_airport";
    pub const RATING: &str = "rating";

    // airplane / airplane_type
    pub const AIRPLANE_ID: &str = "airplane_id";
    pub const TYPE_ID: &str = "type_id";
    pub const REGISTRATION: &str = "registration";
    pub const CAPACITY: &str = "capacity";
    pub const MAX_RANGE: &str = "max_range";
    pub const DESCRIPTION: &str = "description";
    pub const HAUL: &str = "haul";
    pub const MAKER: &str = "maker";
    pub const MAX_ALTITUDE: &str = "max_altitude";

    // airport
    pub const AIRPORT_ID: &str = "airport_id";
    pub const CITY: &str = "city";
    pub const COUNTRY: &str = "country";

    // flight
    pub const FLIGHT_ID: &str = "flight_id";
    pub const ORIGIN_AIRPORT_ID: &str = "origin_airport_id";
    pub const DEST_AIRPORT_ID: &str = "dest_airport_id";
    pub const EXPECTED_DEPARTURE: &str = "expected_departure";
    pub const ACTUAL_DEPARTURE: &str = "actual_departure";
    pub const ARRIVAL: &str = "arrival";
    pub const DELAY: &str = "delay";
    pub const TRIP_DURATION: &str = "trip_duration";
    pub const DEPARTURE_MONTH: &str = "departure_month";
    pub const DEPARTURE_YEAR: &str = "departure_year";
    pub const LOAD_FACTOR: &str = "load_factor";
    pub const ORIGIN_CITY: &str = "origin_city";
    pub const ORIGIN_COUNTRY: &str = "origin_country";
    pub const DESTINATION_CITY: &str = "destination_city";
    pub const DESTINATION_COUNTRY: &str = "destination_country";
    pub const BOOKING_COUNT: &str = "booking_count";

    // booking
    pub const BOOKING_ID: &str = "booking_id";
    pub const PASSENGER_AGE: &str = "passenger_age";
    pub const PASSENGER_EMAIL: &str = "passenger_email";
    pub const PASSENGER_NATIONALITY: &str = "passenger_nationality";
    pub const BOOKING_DATE: &str = "booking_date";
    pub const BOOKING_YEAR: &str = "booking_year";
    pub const BOOKING_MONTH: &str = "booking_month";
    pub const NUM_PASSENGERS: &str = "num_passengers";
    pub const IS_AGENT: &str = "is_agent";
    pub const TICKET_TYPE: &str = "ticket_type";
    pub const SEAT_CLASS: &str = "seat_class";
    pub const PRICE: &str = "price";
    pub const WEIGHT_KG: &str = "weight_kg";
    pub const BUSINESS_LOUNGE: &str = "business_lounge";
    pub const INFLIGHT_ENTERTAINMENT: &str = "inflight_entertainment";
    pub const INFLIGHT_FOOD: &str = "inflight_food";

    // passenger_feedback
    pub const PREFERRED_AIRLINE: &str = "preferred_airline";
}
