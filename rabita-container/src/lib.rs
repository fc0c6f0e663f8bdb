//! Core container implementation for rabita DI.

pub mod binding;
pub mod container;
pub mod context;
pub mod error;
pub mod injectable;
pub mod key;
pub mod metadata;
pub mod scope;

pub use container::prelude;
pub use error::{ContainerError, Result};
pub use key::BindingKey;
pub use scope::BindingScope;
