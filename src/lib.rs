//! Salary dashboard over data-career job postings.
//!
//! The [`data`] module holds the whole filter-and-aggregate pipeline; the
//! binary wraps it in an egui front end.

pub mod config;
pub mod data;

pub use data::dashboard::RenderModel;
pub use data::error::DataUnavailable;
pub use data::filter::FilterSelection;
pub use data::model::Dataset;
