//! Domain logic for the staybook back office.
//!
//! Everything in this crate is a pure function over values the caller has
//! already loaded, so the `db` and `api` crates decide *when* data is read
//! and this crate decides *what it means*.

pub mod availability;
pub mod booking;
pub mod clock;
pub mod error;
pub mod identity;
pub mod meal;
pub mod occupant;
pub mod report;
pub mod types;
