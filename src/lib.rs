//! # Delivery Collage
//!
//! Field reports for delivery rounds. At every stop the driver photographs
//! the delivery; the photos are laid out on one canvas with a caption holding
//! the stop's metadata, and at the end of the day all stops are exported as a
//! single PDF.
//!
//! # Architecture: Stop → Report → Document
//!
//! ```text
//! 1. Capture   camera + locator  →  PhotoStore       (frames stamped with metadata)
//! 2. Compose   PhotoStore        →  Report           (1200x900 JPEG, caption band)
//! 3. Export    SessionLedger     →  PDF              (one report per page slot)
//! ```
//!
//! The [`workflow::Workflow`] owns every piece of mutable state and sequences
//! the stages. Composition and pagination are pure functions over their
//! inputs; drawing goes through the [`imaging::Surface`] trait so layout can
//! be tested without rasterizing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`workflow`] | Session owner: login, capture, save stop, close session |
//! | [`store`] | Photos of the stop in progress |
//! | [`session`] | Saved reports and `Stop N` numbering |
//! | [`collage`] | Composes a stop into a JPEG report |
//! | [`imaging`] | Grid math, text fitting, drawing surfaces, JPEG encoding |
//! | [`watermark`] | PNG watermark state |
//! | [`metadata`] | Capture stamping and caption text |
//! | [`export`] | Page planning and PDF writing |
//! | [`capture`] | Camera boundary and file-backed frames |
//! | [`location`] | Position and reverse-geocoding boundary |
//! | [`auth`] | Shared-password gate |
//! | [`plan`] | Session plan files replayed by the CLI |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`naming`] | File names for exported artifacts |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Records shared between stages |
//!
//! # Design Decisions
//!
//! ## Explicit Draw Styles
//!
//! Every [`imaging::Surface`] call carries its own color, opacity, or text
//! style. There is no ambient "current alpha" to restore, so a watermark
//! drawn at 50% cannot leave the caption translucent.
//!
//! ## Nothing Persists
//!
//! Photos and reports live in memory for one session. The only files written
//! are the ones the user asks for: report JPEGs and the session PDF.

pub mod auth;
pub mod capture;
pub mod collage;
pub mod config;
pub mod export;
pub mod imaging;
pub mod location;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod plan;
pub mod session;
pub mod store;
pub mod types;
pub mod watermark;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_helpers;
