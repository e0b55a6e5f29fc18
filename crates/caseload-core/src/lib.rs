pub mod appointment;
pub mod config;
pub mod form;
pub mod schedule;

#[cfg(not(target_arch = "wasm32"))]
pub mod datastore;
