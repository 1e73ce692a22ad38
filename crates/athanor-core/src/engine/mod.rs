//! # Engine Module
//!
//! This module implements the protocol engine for absolute solvation free
//! energy calculations in Athanor, providing the computational framework for
//! task graph construction, validation, and unit execution workflows.
//!
//! ## Overview
//!
//! The engine module orchestrates the complete planning process for a
//! solvation transformation. It freezes settings into immutable trees,
//! validates chemical states against those settings, expands the
//! transformation into independent execution units, and hands each unit the
//! phase-specific settings bundle and workspace it needs to run against a
//! simulation backend.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of the planning and execution process:
//!
//! - **Configuration** ([`settings`]) - Protocol parameters, lambda schedules, and defaults
//! - **Validation** ([`validation`]) - Compatibility checks between states and settings
//! - **Planning** ([`protocol`]) - Task graph construction from a pair of end states
//! - **Execution Units** ([`unit`]) - Independent leg/repeat work items and their lifecycle
//! - **Settings Projection** ([`projection`]) - Per-phase settings bundles
//! - **Backends** ([`backend`]) - The seam between planning and simulation engines
//! - **Results** ([`result`]) - Output contracts and failure records
//! - **Progress Monitoring** ([`progress`]) - Progress reporting and user feedback mechanisms
//! - **Error Handling** ([`error`]) - Engine-specific error types and error propagation
//!
//! ## Key Capabilities
//!
//! - **Repeat expansion** materializing every leg/repeat combination as its own unit
//! - **Fail-fast validation** aborting graph construction before any unit exists
//! - **Immutable settings sharing** so no unit can drift from its siblings
//! - **Phase projection** resolving solvent/vacuum settings bundles from one tree
//! - **Pluggable backends** keeping simulation engines behind a narrow trait
//! - **Self-describing results** matching records to units without positional order
//! - **Progress monitoring** with per-unit completion and failure reporting
//! - **Comprehensive error handling** with detailed diagnostic information

pub mod backend;
pub mod context;
pub mod error;
pub(crate) mod probe;
pub mod progress;
pub mod projection;
pub mod protocol;
pub mod result;
pub mod settings;
pub mod unit;
pub mod validation;
