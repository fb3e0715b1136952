//! HTTP handlers for the Compositions domain

pub mod compositions;
