//! Integration tests for serial-thermo.
//!
//! Each test file is also built as its own test crate; this module groups
//! them so they can be run together.
