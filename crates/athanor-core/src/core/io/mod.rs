//! Provides input functionality for structure file formats.
//!
//! This module contains the reader for the structure-data files solvation
//! datasets ship as: multi-entry V2000 files carrying conformers, partial
//! charges, and free-form data items. Parsing is strict about the records it
//! understands and reports 1-based line numbers in its errors.

pub mod sdf;
