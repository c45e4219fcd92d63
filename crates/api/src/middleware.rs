/// Bearer-token session extraction
pub mod auth;
/// Mapping of domain errors onto HTTP responses
pub mod error_handling;
