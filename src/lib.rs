//! geodist: great-circle distance between two addresses over HTTP
//!
//! `GET /distance?address1=..&address2=..` geocodes both addresses through a
//! Nominatim-style provider and answers with the haversine distance in
//! kilometers. Everything else is served from a static directory.

pub mod config;
pub mod geo;
pub mod geocoder;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
