pub mod form_data;
pub mod format;
pub mod resolver;
pub mod store;
