pub mod types;
pub mod error;
pub mod config;
pub mod objects;
pub mod compositor;
pub mod selection;
pub mod upload;
pub mod form;
pub mod backend;
pub mod generation;
pub mod surface;
pub mod view;
pub mod engine;
pub mod svg;
pub mod image_ops;
pub mod io;
pub mod render;
pub mod dom;
pub mod app;

#[cfg(test)]
pub(crate) mod testing;

pub use app::ProductConfigurator;
pub use engine::Configurator;
pub use error::{ConfiguratorError, Result};
pub use types::*;
