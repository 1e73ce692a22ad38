//! # Core Module
//!
//! This module provides the chemical vocabulary and data handling that the
//! orchestration engine of Athanor is built on.
//!
//! ## Overview
//!
//! The core module implements the value types describing transformation end
//! states, the partition between them, and the ingestion path that produces
//! those states from dataset files. Everything here is inert data: no
//! validation policy, no task construction, no execution.
//!
//! ## Architecture
//!
//! The module is organized into submodules that handle different aspects of
//! the chemistry layer:
//!
//! - **Chemical Representation** ([`models`]) - Components, end states, and
//!   the alchemical partition between two states
//! - **File I/O** ([`io`]) - Strict readers for the structure-data files
//!   solvation datasets ship as
//! - **Dataset Ingestion** ([`ingest`]) - Batch construction of solvated end
//!   states with an explicit, caller-scoped solvent cache
//!
//! ## Key Capabilities
//!
//! - **Faithful end-state modeling** where unsimulatable states remain
//!   constructible and are rejected downstream with precise diagnostics
//! - **Value-equality component mapping** that recognizes decoupling
//!   transformations by shape
//! - **Line-accurate parse errors** for malformed dataset files
//! - **Deterministic iteration** over roles and cached species, so derived
//!   listings are stable across runs

pub mod ingest;
pub mod io;
pub mod models;
