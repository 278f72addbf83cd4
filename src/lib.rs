//! US Agricultural Exports Dashboard
//!
//! Export table building, filtering and chart rendering for the 2011 US
//! agricultural exports dataset.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod gui;
