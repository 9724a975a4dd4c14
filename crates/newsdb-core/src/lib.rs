#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod article;
pub mod category;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;
