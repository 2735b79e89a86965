//! # fleetdash
//!
//! A read-only dashboard for server-fleet telemetry kept in a hosted
//! PostgREST table (Supabase). The whole table is fetched once, validated
//! at the boundary, reduced to tallies and per-server projections, and
//! drawn as a terminal dashboard or printed as a report.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | Server records and the boundary schema for raw rows |
//! | [`aggregate`] | Status/alert tallies and per-metric projections |
//! | [`store`] | `RemoteStore` seam and the REST client |
//! | [`fetch`] | One-shot fetch orchestration and dashboard state |
//! | [`view`] | Pure mapping from dashboard state to widget content |
//! | [`report`] | Text/JSON output for the `summary` command |
//! | [`config`] | TOML configuration |
//! | [`error`] | Error type and `Result` alias |
//! | `tui` | Terminal dashboard (feature `tui`) |

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod report;
pub mod store;
pub mod view;

#[cfg(feature = "tui")]
pub mod tui;

pub use config::Config;
pub use error::{DashError, Result};
