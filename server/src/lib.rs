//! Backend for the valentine proposal-sharing app: a sender creates a
//! personalized proposal, shares its short link, and the recipient's
//! page fetches and accepts it. Three operations, one record type.

pub mod routes;
pub mod service;
pub mod store;
