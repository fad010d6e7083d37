//! Data models for Courtbook

mod court;
mod profile;
mod reservation;
mod slot;

pub use court::*;
pub use profile::*;
pub use reservation::*;
pub use slot::*;
