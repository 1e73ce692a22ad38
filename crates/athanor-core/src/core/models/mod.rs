//! # Core Models Module
//!
//! This module contains the fundamental data structures used to describe the
//! chemistry of a solvation campaign, providing the vocabulary every other
//! layer of Athanor speaks.
//!
//! ## Overview
//!
//! The models module defines the value types for chemical end states and the
//! partition between them. These models are designed to:
//!
//! - **Represent end states faithfully** - Any combination of components is
//!   constructible, including states no protocol can simulate
//! - **Stay immutable** - Systems and components are values; derivations
//!   produce new values and never mutate their inputs
//! - **Force exhaustive handling** - The closed [`component::Component`] enum
//!   makes every consumer take a position on every component kind
//! - **Keep iteration deterministic** - Role-ordered maps so derived labels
//!   and listings are identical across runs
//!
//! ## Key Components
//!
//! - [`small_molecule`] - The alchemical payload: a charged, single-conformer
//!   organic molecule
//! - [`solvent`] - Bulk environment identified by SMILES, with optional
//!   explicit monomer and ion content
//! - [`protein`] - Biopolymer placeholder so unsupported systems fail in
//!   validation, not in construction
//! - [`component`] - The closed sum of component kinds, including the
//!   explicit `Absent` placeholder
//! - [`system`] - A named, role-keyed end state of a transformation
//! - [`mapping`] - Value-equality partition of two end states into unique and
//!   mapped components
//!
//! ## Usage
//!
//! Most campaigns start by building the solvated end state and deriving the
//! decoupled one from it.
//!
//! ```ignore
//! use athanor::core::models::{solvent::Solvent, system::ChemicalSystem};
//!
//! let state_a = ChemicalSystem::builder("benzene in water")
//!     .solute(benzene)
//!     .solvent(Solvent::water())
//!     .build();
//! let state_b = state_a.without("solute");
//! ```

pub mod component;
pub mod mapping;
pub mod protein;
pub mod small_molecule;
pub mod solvent;
pub mod system;
