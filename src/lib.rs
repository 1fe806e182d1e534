//! Command-line surface for the Flet server.

pub mod cli;
