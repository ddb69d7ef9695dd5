//! OneLink Core Library
//! Configuration and proxy handlers behind the OneLink API

pub mod config;
pub mod proxy;
