pub mod bias;
pub mod gradient;
pub mod weight;

pub use bias::BiasVector;
pub use gradient::Gradient;
pub use weight::WeightMatrix;
