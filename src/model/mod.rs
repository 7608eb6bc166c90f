//! Model layer - catalog data and per-screen state
//!
//! - `Catalog` - immutable curriculum table
//! - `SelectionState` - navigator drill-down state
//! - `SimulationStepState` - bounded simulation step index
//! - `MediaState` - simulation video lookup state
//! - `ModalStack` - modal overlay management
//! - `AppMode`, `Screen` - top-level presentation state

pub mod catalog;
pub mod media;
pub mod modal;
pub mod selection;
pub mod simulation;
pub mod ui;

pub use catalog::{
    Catalog, Category, ClassId, ClassLevel, Experiment, ExperimentDetail, ExperimentId, Textbook,
    TextbookId, VivaQuestion,
};
pub use media::{media_key, MediaState};
pub use modal::{Modal, ModalStack};
pub use selection::{DetailTab, SelectionState, View};
pub use simulation::{step_visual, FinishBehavior, SimulationStepState, StepOutcome, StepVisual, Tone};
pub use ui::{AppMode, Screen};
