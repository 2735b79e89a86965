//! fleetdash terminal dashboard
//!
//! A single-page terminal view of the fleet: resource usage bars, status
//! share, alert distribution, network traffic, the server table and a
//! usage comparison chart. Data is fetched once at startup.
//!
//! # Usage
//!
//! ```bash
//! SUPABASE_URL=https://abc.supabase.co SUPABASE_KEY=... fleetdash
//! ```
//!
//! # Architecture
//!
//! - [`app`] - Application state, event loop, and keyboard handling
//! - [`ui`] - Page layout
//! - [`widgets`] - Reusable TUI widget components

pub mod app;
pub mod ui;
pub mod widgets;
