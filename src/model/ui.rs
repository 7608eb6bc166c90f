//! Presentation state owned by the app rather than a single screen

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Splash,
    Running,
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Class → textbook → experiment drill-down
    #[default]
    Catalog,
    /// Highlighted labs opened directly
    Featured,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Catalog => "Catalog",
            Screen::Featured => "Featured Labs",
        }
    }

    pub fn toggled(&self) -> Screen {
        match self {
            Screen::Catalog => Screen::Featured,
            Screen::Featured => Screen::Catalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Screen::Catalog.toggled(), Screen::Featured);
        assert_eq!(Screen::Catalog.toggled().toggled(), Screen::Catalog);
    }
}
