pub mod export;
pub mod fetch;
pub mod human;
pub mod model;
pub mod tree;
pub mod treemap;

pub use fetch::*;
pub use model::*;
pub use tree::*;
