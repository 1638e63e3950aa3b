//! Type definitions

pub mod order;
pub mod route;
pub mod stop;

pub use order::*;
pub use route::*;
pub use stop::*;
