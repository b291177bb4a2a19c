pub mod dataset;
pub mod run;
