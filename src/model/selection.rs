//! Catalog navigator selection state
//!
//! Cascade rules:
//! - choosing a class clears textbook and experiment
//! - choosing a textbook clears experiment
//! - entering or leaving an experiment resets the tab to theory

use super::catalog::{ClassId, Experiment, Textbook};

/// Tab shown in the lab detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Theory,
    Procedure,
    Simulation,
    Guide,
    Viva,
}

impl DetailTab {
    pub fn all() -> [DetailTab; 5] {
        [
            DetailTab::Theory,
            DetailTab::Procedure,
            DetailTab::Simulation,
            DetailTab::Guide,
            DetailTab::Viva,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            DetailTab::Theory => "Theory",
            DetailTab::Procedure => "Procedure",
            DetailTab::Simulation => "Simulation",
            DetailTab::Guide => "Guide",
            DetailTab::Viva => "Viva",
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    /// Tab for a 1-based number key
    pub fn from_number(n: u32) -> Option<DetailTab> {
        let idx = usize::try_from(n).ok()?.checked_sub(1)?;
        Self::all().get(idx).copied()
    }

    pub fn next(&self) -> DetailTab {
        let tabs = Self::all();
        tabs[(self.index() + 1) % tabs.len()]
    }

    pub fn previous(&self) -> DetailTab {
        let tabs = Self::all();
        tabs[(self.index() + tabs.len() - 1) % tabs.len()]
    }
}

/// Level of the hierarchy currently shown in the right pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Nothing chosen yet
    Classes,
    /// A class is chosen, its textbooks are listed
    Textbooks,
    /// A textbook is chosen, its experiments are listed
    Experiments,
    /// An experiment is open in the tabbed lab view
    Lab,
}

/// Per-navigator selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    class: Option<ClassId>,
    textbook: Option<Textbook>,
    experiment: Option<Experiment>,
    tab: DetailTab,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(&self) -> Option<&ClassId> {
        self.class.as_ref()
    }

    pub fn textbook(&self) -> Option<&Textbook> {
        self.textbook.as_ref()
    }

    pub fn experiment(&self) -> Option<&Experiment> {
        self.experiment.as_ref()
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn view(&self) -> View {
        match (&self.class, &self.textbook, &self.experiment) {
            (Some(_), Some(_), Some(_)) => View::Lab,
            (Some(_), Some(_), None) => View::Experiments,
            (Some(_), None, _) => View::Textbooks,
            (None, _, _) => View::Classes,
        }
    }

    pub fn select_class(&mut self, id: &ClassId) {
        self.class = Some(id.clone());
        self.textbook = None;
        self.experiment = None;
        self.tab = DetailTab::Theory;
    }

    /// Choose a textbook of the current class. Ignored when no class is chosen.
    pub fn select_textbook(&mut self, textbook: &Textbook) {
        if self.class.is_none() {
            tracing::warn!(textbook = %textbook.id, "textbook selected without a class");
            return;
        }
        self.textbook = Some(textbook.clone());
        self.experiment = None;
        self.tab = DetailTab::Theory;
    }

    /// Open an experiment of the current textbook. Ignored when no textbook is chosen.
    pub fn select_experiment(&mut self, experiment: &Experiment) {
        if self.textbook.is_none() {
            tracing::warn!(experiment = %experiment.id, "experiment selected without a textbook");
            return;
        }
        self.experiment = Some(experiment.clone());
        self.tab = DetailTab::Theory;
    }

    pub fn set_tab(&mut self, tab: DetailTab) {
        if self.experiment.is_some() {
            self.tab = tab;
        }
    }

    /// Step one level up the hierarchy and return the view now shown
    pub fn back(&mut self) -> View {
        match self.view() {
            View::Lab => {
                self.experiment = None;
                self.tab = DetailTab::Theory;
            }
            View::Experiments => self.textbook = None,
            View::Textbooks => self.class = None,
            View::Classes => {}
        }
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::{Category, ExperimentId, TextbookId};

    fn textbook() -> Textbook {
        Textbook {
            id: TextbookId::new("science-9"),
            title: "NCERT Science Textbook".to_string(),
        }
    }

    fn experiment(id: &str) -> Experiment {
        Experiment {
            id: ExperimentId::new(id),
            title: id.to_string(),
            category: Category::Microscopy,
        }
    }

    fn at_lab() -> SelectionState {
        let mut s = SelectionState::new();
        s.select_class(&ClassId::new("class-9"));
        s.select_textbook(&textbook());
        s.select_experiment(&experiment("onion-peel"));
        s
    }

    #[test]
    fn test_initial_state() {
        let s = SelectionState::new();
        assert_eq!(s.view(), View::Classes);
        assert_eq!(s.tab(), DetailTab::Theory);
    }

    #[test]
    fn test_drill_down_populates_levels() {
        let mut s = SelectionState::new();
        s.select_class(&ClassId::new("class-9"));
        assert_eq!(s.view(), View::Textbooks);
        assert!(s.textbook().is_none() && s.experiment().is_none());

        s.select_textbook(&textbook());
        assert_eq!(s.view(), View::Experiments);
        assert!(s.experiment().is_none());

        s.select_experiment(&experiment("onion-peel"));
        assert_eq!(s.view(), View::Lab);
        assert_eq!(s.class().unwrap().as_str(), "class-9");
    }

    #[test]
    fn test_select_class_clears_lower_levels() {
        let mut s = at_lab();
        s.set_tab(DetailTab::Viva);
        s.select_class(&ClassId::new("class-10"));

        assert_eq!(s.view(), View::Textbooks);
        assert!(s.textbook().is_none());
        assert!(s.experiment().is_none());
        assert_eq!(s.tab(), DetailTab::Theory);
    }

    #[test]
    fn test_select_textbook_clears_experiment() {
        let mut s = at_lab();
        s.select_textbook(&textbook());
        assert_eq!(s.view(), View::Experiments);
        assert!(s.experiment().is_none());
    }

    #[test]
    fn test_out_of_order_selections_are_ignored() {
        let mut s = SelectionState::new();
        s.select_textbook(&textbook());
        assert_eq!(s.view(), View::Classes);

        s.select_experiment(&experiment("onion-peel"));
        assert_eq!(s.view(), View::Classes);

        s.select_class(&ClassId::new("class-9"));
        s.select_experiment(&experiment("onion-peel"));
        assert_eq!(s.view(), View::Textbooks);
    }

    #[test]
    fn test_back_steps_one_level() {
        let mut s = at_lab();
        s.set_tab(DetailTab::Procedure);

        assert_eq!(s.back(), View::Experiments);
        assert_eq!(s.textbook().unwrap().id.as_str(), "science-9");
        assert_eq!(s.tab(), DetailTab::Theory);

        assert_eq!(s.back(), View::Textbooks);
        assert!(s.class().is_some());

        assert_eq!(s.back(), View::Classes);
        assert_eq!(s.back(), View::Classes);
    }

    #[test]
    fn test_switching_experiment_resets_tab() {
        let mut s = at_lab();
        s.set_tab(DetailTab::Simulation);
        s.select_experiment(&experiment("plant-cells"));
        assert_eq!(s.tab(), DetailTab::Theory);
        assert_eq!(s.experiment().unwrap().id.as_str(), "plant-cells");
    }

    #[test]
    fn test_set_tab_requires_experiment() {
        let mut s = SelectionState::new();
        s.select_class(&ClassId::new("class-9"));
        s.set_tab(DetailTab::Viva);
        assert_eq!(s.tab(), DetailTab::Theory);
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(DetailTab::Theory.next(), DetailTab::Procedure);
        assert_eq!(DetailTab::Viva.next(), DetailTab::Theory);
        assert_eq!(DetailTab::Theory.previous(), DetailTab::Viva);
        assert_eq!(DetailTab::from_number(3), Some(DetailTab::Simulation));
        assert_eq!(DetailTab::from_number(0), None);
        assert_eq!(DetailTab::from_number(6), None);
    }
}
