pub mod evaluate;
pub mod loop_fn;
pub mod reducer;
pub mod train_config;

pub use evaluate::{argmax, success_rate};
pub use loop_fn::train_loop;
pub use reducer::BatchReducer;
pub use train_config::TrainConfig;
