//! Validation of input tables against compiled field rules.

#![deny(unsafe_code)]

pub mod error;
pub mod executor;

pub use error::{Result, ValidationError};
pub use executor::{
    VALIDATION_SUFFIX, ValidationRun, execute, validation_column_name,
};
