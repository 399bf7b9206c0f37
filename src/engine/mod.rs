pub mod command;
pub mod controller;
pub mod error;
pub mod notify;
