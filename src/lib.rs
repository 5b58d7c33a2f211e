// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod driver;
pub mod encode;
pub mod parser;
pub mod render;
pub mod schema;
pub mod source;
pub mod uml;
