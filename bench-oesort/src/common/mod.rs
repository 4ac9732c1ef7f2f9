pub mod cli;
pub mod generators;
pub mod utils;
