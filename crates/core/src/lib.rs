//! Courtbook Core Library
//!
//! Court models, slot availability and booking eligibility rules, identity
//! resolution, and storage for the club booking system.

pub mod admin;
pub mod booking;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod storage;

pub use admin::ClubAdmin;
pub use booking::{BookingOutcome, BookingService, CancellationOutcome};
pub use config::{ClubConfig, ConfigError};
pub use engine::{AvailabilityEngine, BookingGrant, Cell, CellState, CourtRow, Decision, Grid, Rejection};
pub use error::{Error, Result};
pub use identity::{Anonymous, IdentityProvider, SessionIdentity};
pub use models::*;
pub use permissions::*;
pub use storage::{CourtRepository, Database, ProfileRepository, ReservationRepository, Storage};
