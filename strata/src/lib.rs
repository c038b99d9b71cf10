pub mod domain;
pub mod ports;
pub mod retry;
pub mod service;
