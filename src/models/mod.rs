pub mod data;
pub mod info;
pub mod rules;

pub use data::*;
pub use info::MrzInfo;
pub use rules::{MrzRules, Substitution};
