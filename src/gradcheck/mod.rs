pub mod checker;
pub mod trace;

pub use checker::{compare, cost, GradientChecker};
pub use trace::Trace;
