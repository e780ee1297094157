//! Utility functions

pub mod masking;
