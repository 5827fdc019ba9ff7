//! Core pipeline for MOS gm/Id characterization: renders a parameterized
//! DC-sweep netlist, drives an external ngspice process, parses the flat
//! numeric output into derived figures of merit, and keeps a bounded
//! history of prior sweeps for overlay comparison.

pub mod config;
pub mod device;
pub mod error;
pub mod export;
pub mod history;
pub mod parser;
pub mod runner;
pub mod sweep;
pub mod template;
