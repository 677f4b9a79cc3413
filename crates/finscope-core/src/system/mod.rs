//! # System Module
//!
//! Maturity stages and their static descriptor table.
//!
//! The table is process-wide constant data; the scorer produces a [`Stage`]
//! and every consumer reads titles, problems and solutions from here.

mod stage;

pub use stage::*;
