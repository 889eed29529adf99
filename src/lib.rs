pub mod advice;
pub mod analyzers;
pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod model;
pub mod output;
pub mod views;

pub use error::{Result, TardisError};
