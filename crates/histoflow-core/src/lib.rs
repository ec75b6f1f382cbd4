//! Histoflow Core Types
//!
//! This crate provides the foundational types shared by the histoflow
//! parser and flow calculator:
//!
//! - **Identifiers**: Interned group names ([`identifier::Id`])
//! - **Groups**: The breakdown graph model ([`group::GroupGraph`])
//! - **Histograms**: The data source boundary ([`histogram::HistogramSource`])

pub mod group;
pub mod histogram;
pub mod identifier;
