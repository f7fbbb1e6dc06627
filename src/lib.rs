pub mod cache;
pub mod config;
pub mod fingering;
pub mod pitch;
pub mod render;
pub mod theory;
pub mod tuning;

pub use fingering::{FingeringEngine, FretAssignment, compute_fingerings};
pub use pitch::{Pitch, PitchClass};
pub use tuning::TuningEntry;

/// Application name for XDG paths
pub const APP_NAME: &str = "fretwise";
