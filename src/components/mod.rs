//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod featured;
pub mod help_dialog;
pub mod lab;
pub mod layout;
pub mod navigator;
pub mod quit_dialog;
pub mod simulation;
pub mod splash;

use crate::model::Category;
use ratatui::style::Color;

pub use featured::{draw_featured, FeaturedComponent};
pub use help_dialog::HelpDialog;
pub use lab::{LabComponent, LabVariant};
pub use layout::{calculate_lab_layout, calculate_main_layout, centered_popup};
pub use navigator::{draw_class_list, draw_navigator, NavigatorComponent};
pub use quit_dialog::QuitDialog;
pub use splash::SplashComponent;

/// Badge colour for an experiment category
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Microscopy => Color::Blue,
        Category::Molecular => Color::Magenta,
        Category::Chemical | Category::General => Color::Green,
    }
}
