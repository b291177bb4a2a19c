//! Dataset evaluation and run aggregation.

pub mod dataset;
pub mod pairs;
pub mod report;
pub mod run;
