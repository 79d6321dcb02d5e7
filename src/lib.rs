// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
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
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Core of a small real-time 3D sandbox: a free-fly camera controller and
//! an asynchronous, multi-part texture assembly pipeline.
//!
//! # Key entry points
//!
//! - [`camera::Camera`] - yaw/pitch fly camera driven by input events and
//!   elapsed time
//! - [`input::InputProcessor`] - turns raw window events into camera
//!   mutations and application actions
//! - [`assets::AssetLoader`] - fans out per-part byte fetches and publishes
//!   cubemaps, texture arrays and single images once every part arrived
//! - [`gpu::TextureSink`] - where decoded composite textures are published
//! - [`options::Options`] - TOML-backed configuration
//!
//! # Architecture
//!
//! Fetches run on a small pool of background threads owned by
//! [`assets::FetchService`]. Their completions are queued and only observed
//! when the host loop calls [`assets::AssetLoader::do_work`], so every
//! request record and every user callback lives on the loop thread. A
//! composite request is finalized (decode, validate, publish or fail)
//! exactly once, by the completion that brings its finished-part count to
//! the part count.

pub mod assets;
pub mod camera;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;

pub use error::VistaError;
