//! Implementations behind the `hassert` subcommands.
pub mod check;
pub mod generate;
pub mod resolve;
