//! A minimalistic life-balance activity planner.
//!
//! Activities live in memory in an [`store::ActivityStore`] and are saved in
//! full to a single key-value slot on every change.

#[macro_use]
extern crate prettytable;

pub mod category;
pub mod config;
pub mod error;
pub mod interface;
pub mod metrics;
pub mod model;
pub mod storage;
pub mod store;
pub mod timeline;
