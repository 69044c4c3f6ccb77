pub mod reporting;
mod store;

pub use reporting::*;
pub use store::*;
