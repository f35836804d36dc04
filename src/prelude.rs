//! Exposes the traits `Assign`, `Resolve`, `Node`, `Record` and `Diagnose`.
pub use crate::{
    assign::Assign, diagnostic::Diagnose, node::Node, record::Record, resolve::Resolve,
};
