//! Career Explorer — profile wizard plus a two-agent career advisor.

pub mod channels;
pub mod config;
pub mod crew;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod profile;
pub mod session;
pub mod wizard;
