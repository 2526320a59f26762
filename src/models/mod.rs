pub mod condition;
pub mod enums;
pub mod exercise;
pub mod options;
pub mod patient;
pub mod prescription;
pub mod progress;

pub use condition::*;
pub use enums::*;
pub use exercise::*;
pub use options::*;
pub use patient::*;
pub use prescription::*;
pub use progress::*;
