pub mod dispatch;
pub mod engine;

pub use dispatch::Sequencing;
pub use engine::{Manager, Pending};
