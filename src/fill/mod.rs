pub mod executor;
pub mod feedback;
pub mod select;
pub mod session;
