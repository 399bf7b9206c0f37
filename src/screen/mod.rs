pub mod classifier;
pub mod field_model;
pub mod label;
pub mod scan;
pub mod scorer;
