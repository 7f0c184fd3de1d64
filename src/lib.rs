//! Labor entitlements engine for Chilean labor law
//!
//! This crate computes two things from the Código del Trabajo and the income
//! tax law: the termination settlement (finiquito) owed when a contract ends,
//! and the monthly net salary (sueldo líquido) after contributions and tax.
//! Every result carries an audit trace of the steps that produced it.
//!
//! The economic indicators both engines depend on (UF, UTM, IMM) live in an
//! immutable [`config::EconomicConfig`] snapshot that the [`indicators`]
//! module refreshes from a provider.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod indicators;
pub mod models;
