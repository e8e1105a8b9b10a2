//! Value module - Dynamically typed representation of serialized object trees.
//!
//! This module provides the value model and the add-mapped-data rule.

mod value;

pub use value::*;
