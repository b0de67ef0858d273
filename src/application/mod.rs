// Application layer: the bank facade front ends talk to.

pub mod service;

pub use service::*;
