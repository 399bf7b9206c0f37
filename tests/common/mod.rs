#![allow(dead_code)]

pub mod surfaces;
pub mod utils;
