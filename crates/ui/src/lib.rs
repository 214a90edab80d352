pub mod error;
pub mod vm;

pub use error::ViewError;
