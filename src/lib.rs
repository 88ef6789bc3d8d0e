//! Overtime and Surcharge Engine for Colombian Labour Law
//!
//! This crate classifies the hours in shift punch records into the seven
//! statutory categories of the Código Sustantivo del Trabajo: daytime and
//! nighttime overtime on ordinary days and on holidays, the night surcharge,
//! the holiday night surcharge and the holiday surcharge.
//!
//! # Example
//!
//! ```
//! use overtime_engine::calculation::calculate_batch;
//! use overtime_engine::config::RegulationConfig;
//! use overtime_engine::models::ShiftRequest;
//! use rust_decimal::Decimal;
//!
//! let requests: Vec<ShiftRequest> = serde_json::from_str(r#"[
//!     {"id": "rec_1", "operator_id": "op_1",
//!      "start": "2025-03-04T22:00", "end": "2025-03-05T02:00"}
//! ]"#).unwrap();
//!
//! let result = calculate_batch(&requests, &RegulationConfig::colombia()).unwrap();
//! assert_eq!(result.records[0].totals.night_surcharge, Decimal::from(4));
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
