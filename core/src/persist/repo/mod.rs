pub mod common;
pub mod regions;
pub mod users;

pub use regions::*;
pub use users::*;
