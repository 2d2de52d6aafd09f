//! Display the processes running on a host as a tree.
//!
//! The pipeline is: a [`source::ProcessSource`] fills a [`repository::ProcessRepository`],
//! [`tree::ProcessForest::build`] links the records, and a [`render::TreeRenderer`] writes the
//! forest (or one subtree, through [`query::SubtreeQuery`]) to any [`std::io::Write`] sink.

pub mod logger;

pub mod app;
pub mod config;
mod helpers;
pub mod local_logger;
mod prelude;
pub mod process;
pub mod query;
pub mod render;
pub mod repository;
pub mod source;
pub mod stats;
pub mod tree;

pub use helpers::{format_memory, format_uptime};
pub use local_logger::clean_logger;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
