//! # Workflows Module
//!
//! This module provides high-level workflow implementations that orchestrate
//! complete solvation free-energy campaigns in Athanor.
//!
//! ## Overview
//!
//! Workflows are the top-level entry points for users of Athanor. They
//! encapsulate the entire pipeline from a pair of chemical end states to a
//! partitioned set of result records: settings freezing, validation, task
//! graph construction, workspace allocation, backend dispatch, and outcome
//! collection, providing a clean and simple API for a multi-unit campaign.
//!
//! ## Architecture
//!
//! The module is organized around specific transformation workflows:
//!
//! - **Solvation Workflow** ([`solvation`]) - Absolute solvation free-energy
//!   planning and execution across solvent and vacuum legs.
//!
//! ## Key Capabilities
//!
//! - **One-call planning** from end states and settings to a full task graph
//! - **Fault-isolated execution** where no unit failure blocks its siblings
//! - **Progress monitoring** with per-unit completion and failure reporting
//! - **Outcome partitioning** separating completed records from failures
//! - **Estimability checks** before any downstream aggregation is attempted

pub mod solvation;
