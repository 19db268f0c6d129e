//! Benchmark utilities for the shoal engine.
//!
//! - **Microbenchmarks**: single store operations (spawn, view iteration, view cache rebuilds,
//!   command flushes)
//! - **Scenario benchmarks**: whole aquarium frames (schools of fish, pellet rain)
//! - **Frame timing**: per-step statistics for a [`Stepper`](shoal_engine::core::Stepper) driven
//!   loop
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p shoal_bench
//!
//! # Run specific benchmark group
//! cargo bench -p shoal_bench -- view
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports.

pub mod components;
pub mod frame_timer;
pub mod scenarios;
