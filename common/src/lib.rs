//! Domain types shared between the wasm UI engine and the backend: the static
//! amp model catalog, preset payloads, and the validation rules both sides
//! enforce.

#[macro_use]
extern crate serde_derive;

pub mod amp_models;
pub mod preset;
pub mod validation;

pub use crate::{amp_models::*, preset::*, validation::*};
