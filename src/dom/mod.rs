pub mod extract;
pub mod page;
pub mod surface;
