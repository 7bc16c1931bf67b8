//! Nodus IP: static IPv4 switching for PLC field work
//!
//! A library for listing physical network adapters, assigning them a
//! static IPv4 address through the OS configuration utility, and checking
//! that the device on the other end answers.

pub mod config;
pub mod ipconfig;
pub mod network;
pub mod probe;
pub mod profiles;
pub mod time;
pub mod update;
