pub mod classify;

pub use classify::ProjectClassifier;
