//! Worker job feeds: tag overlap plus the locality views built on top of it.

mod service;
pub mod tags;

pub use service::MatchingService;
