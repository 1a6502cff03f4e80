// Cache Simulator Library

pub mod generator;
pub mod input;
pub mod replay;
pub mod stats;
