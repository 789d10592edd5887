mod builder;
mod cables;
mod error;
mod loadcsv;
mod network;
mod records;
mod reduce;
mod registry;

pub mod debug;
pub mod diagnostics;

pub use builder::*;
pub use cables::*;
pub use error::*;
pub use loadcsv::*;
pub use network::*;
pub use records::*;
pub use reduce::*;
pub use registry::*;

pub use diagnostics::{analyze, TopologyReport};

#[cfg(test)]
mod tests;
