pub mod draw;
pub mod error;
pub mod init;
pub mod proc;
pub mod torus;

pub use error::{Error, Result};
pub use proc::World;
