// Shared infrastructure: configuration and the static team lookup.

pub mod config;
pub mod teams;
