#![doc = include_str!("../README.md")]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]

/// Key type stored in the tree
pub type Key = i64;

mod utils;

mod node;
pub use node::{Color, NodeRef};

mod tree;
pub use tree::BalanceTree;

mod rebalance;
pub use rebalance::RebalancePolicy;

mod rotation;

mod render;
pub use render::MAX_RENDER_LEVELS;

mod validate;

mod error;
pub use error::InvariantError;
