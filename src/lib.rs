//! SpaceX launch records dashboard: dataset loading, filtering, chart
//! construction, and the reactive bindings that tie controls to charts.

pub mod analytics;
pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod filter;
pub mod web;
