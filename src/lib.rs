// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Float casts are deliberate in the chart/normalization math
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Chart math frequently compares against exact constants
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

//! Data and rendering pipeline for the SpbNet crystal-structure demo.
//!
//! SpbNet predicts gas adsorption, separation, and intrinsic material
//! properties for crystal structures and exposes per-atom attention
//! scores explaining each prediction. This crate implements the
//! client-side plumbing between the inference API and the demo's four
//! rendering surfaces: a spinning molecule viewer, an attention-weighted
//! viewer, a property box plot, and a volumetric potential-energy scatter.
//!
//! # Key entry points
//!
//! - [`fetch::Orchestrator`] - drives structure/property/attention fetches
//!   against a mutable structure selection
//! - [`attention`] - attention-score to sphere-radius normalization
//! - [`render`] - per-surface adapters producing redraw specs
//! - [`options::Options`] - runtime configuration (API endpoint, viewer
//!   style, slider defaults, chart constants)
//!
//! # Architecture
//!
//! A background [`fetch`] worker thread performs all HTTP against the
//! inference API, delivering results over a channel as tagged events. The
//! host's event loop calls [`Orchestrator::poll`](fetch::Orchestrator::poll)
//! each tick, applies fresh events to the shared [`state::DemoState`], and
//! forwards the resulting change notifications to the [`render`] adapters,
//! each of which rebuilds its surface spec only when its own inputs moved.

pub mod attention;
pub mod client;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod options;
pub mod render;
pub mod state;
pub mod structure;
pub mod task;
