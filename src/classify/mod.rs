pub mod median;
pub mod quadrant;

pub use median::{median, Medians};
pub use quadrant::{Boundary, ClassifierConfig, QuadrantClassifier};
