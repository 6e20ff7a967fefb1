pub mod estimator;

pub use estimator::Estimator;
