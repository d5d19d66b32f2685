//! SkillUp portal core: accounts, certificates, timed assessments,
//! resume editing, and AI-assisted content generation over a single
//! key-value store.
//!
//! This crate is the headless core of a learning/certification portal.
//! A UI drives it in-process; there is no server, database, or wire
//! protocol. State persists through the [`store::KeyValueStore`] port,
//! laid out key-for-key like the original browser portal's
//! `localStorage`, so either implementation can read the other's state.
//!
//! Entry point: [`portal::Portal`] wires everything together.

pub mod accounts;
pub mod ai;
pub mod assessment;
pub mod certificates;
pub mod config;
pub mod errors;
pub mod portal;
pub mod resume;
pub mod store;

pub use config::Config;
pub use errors::PortalError;
pub use portal::Portal;
