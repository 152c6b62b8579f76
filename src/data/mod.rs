pub mod batch;
pub mod idx;
pub mod labeled;
pub mod synthetic;

pub use batch::{shuffle, split_batches};
pub use labeled::{one_hot, LabeledData};
