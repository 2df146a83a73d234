//! Service layer: filter engines, upstream clients, and aggregation.
//!
//! [`registry_service`] and [`sensor_service`] are pure engines over the
//! loaded stores; [`AggregationService`] coordinates the two upstream
//! services through [`UpstreamClient`] and gates every composed response.

pub mod aggregation_service;
pub mod registry_service;
pub mod sensor_service;
pub mod upstream;

pub use aggregation_service::AggregationService;
pub use upstream::UpstreamClient;
