//! E-stop Monitor Common Library
//!
//! Shared constants, indicator types, and configuration loading for the
//! E-stop monitor workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Timing constants and bank limits
//! - [`indicator`] - Indicator channel types
//! - [`config`] - TOML configuration loading and validation

pub mod config;
pub mod consts;
pub mod indicator;
