//! The observation agent: the service that inventories this host and the
//! HTTP router that exposes it.

pub mod observation;
pub mod router;

pub use observation::{system_info, DetectorProvider, ObservationService};
pub use router::{observation_router, serve};
