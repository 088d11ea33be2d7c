#![allow(dead_code)]

pub mod app;
pub mod builders;
pub mod channels;
