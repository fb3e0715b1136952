//! Domain layer for the Compositions domain

pub mod entities;
pub mod error;
pub mod mapper;
