//! # Athanor Core Library
//!
//! A protocol orchestration and validation engine for alchemical absolute
//! solvation free-energy campaigns, covering the control plane from chemical
//! end states to a partitioned set of per-unit result records.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`ChemicalSystem`, `Component`, `AlchemicalComponents`), pure
//!   state-difference algebra, and I/O utilities for molecular input files.
//!
//! - **[`engine`]: The Logic Core.** This layer orchestrates protocol
//!   planning. It freezes settings into immutable trees, validates chemical
//!   states against them, expands a transformation into independent
//!   `ExecutionUnit`s, and defines the `SimulationBackend` seam behind which
//!   all molecular-dynamics work happens.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level,
//!   user-facing layer. It ties the `engine` and `core` together to execute
//!   complete campaigns, from a pair of end states to an outcome ready for
//!   downstream free-energy estimation. It provides a simple and powerful
//!   entry point for end-users of the library.

pub mod core;
pub mod engine;
pub mod workflows;
