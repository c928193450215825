pub mod artifact;
pub mod request;

pub use artifact::*;
pub use request::*;
