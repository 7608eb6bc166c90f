//! Catalog navigator - class → textbook → experiment → lab drill-down
//!
//! The class list stays on the left; the right pane shows whatever level the
//! selection has reached. Owns the selection state, list cursors and the lab
//! viewer for the open experiment.

use super::lab::{draw_lab, LabComponent, LabRenderContext, LabVariant};
use crate::action::Action;
use crate::component::Component;
use crate::model::{Catalog, ClassId, DetailTab, Experiment, SelectionState, View};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Catalog screen state
pub struct NavigatorComponent {
    pub selection: SelectionState,
    pub lab: LabComponent,
    class_list: ListState,
    textbook_list: ListState,
    experiment_list: ListState,
}

impl Default for NavigatorComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigatorComponent {
    pub fn new() -> Self {
        Self {
            selection: SelectionState::new(),
            lab: LabComponent::new(LabVariant::Catalog),
            class_list: ListState::default().with_selected(Some(0)),
            textbook_list: ListState::default(),
            experiment_list: ListState::default(),
        }
    }

    pub fn view(&self) -> View {
        self.selection.view()
    }

    pub fn tab(&self) -> DetailTab {
        self.selection.tab()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor movement
    // ─────────────────────────────────────────────────────────────────────────

    /// Focused list and its length for the current view
    fn focused_list(&mut self, catalog: &Catalog) -> Option<(&mut ListState, usize)> {
        match self.selection.view() {
            View::Classes => Some((&mut self.class_list, catalog.classes().len())),
            View::Textbooks => {
                let len = self
                    .selection
                    .class()
                    .and_then(|id| catalog.class(id))
                    .map(|c| c.textbooks.len())
                    .unwrap_or(0);
                Some((&mut self.textbook_list, len))
            }
            View::Experiments => {
                let len = self
                    .selection
                    .textbook()
                    .map(|t| catalog.experiments_for(&t.id).len())
                    .unwrap_or(0);
                Some((&mut self.experiment_list, len))
            }
            View::Lab => None,
        }
    }

    pub fn next(&mut self, catalog: &Catalog) {
        if let Some((list, len)) = self.focused_list(catalog) {
            if len > 0 {
                let i = list.selected().map(|i| (i + 1) % len).unwrap_or(0);
                list.select(Some(i));
            }
        }
    }

    pub fn previous(&mut self, catalog: &Catalog) {
        if let Some((list, len)) = self.focused_list(catalog) {
            if len > 0 {
                let i = match list.selected() {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                };
                list.select(Some(i));
            }
        }
    }

    pub fn select_first(&mut self, catalog: &Catalog) {
        if let Some((list, len)) = self.focused_list(catalog) {
            list.select(if len > 0 { Some(0) } else { None });
        }
    }

    pub fn select_last(&mut self, catalog: &Catalog) {
        if let Some((list, len)) = self.focused_list(catalog) {
            list.select(len.checked_sub(1));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Drill into the item under the cursor
    pub fn select(&mut self, catalog: &Catalog) {
        match self.selection.view() {
            View::Classes => {
                let Some(class) = self
                    .class_list
                    .selected()
                    .and_then(|i| catalog.classes().get(i))
                else {
                    return;
                };
                self.select_class(catalog, &class.id);
            }
            View::Textbooks => {
                let textbook = self
                    .selection
                    .class()
                    .and_then(|id| catalog.class(id))
                    .and_then(|c| {
                        self.textbook_list
                            .selected()
                            .and_then(|i| c.textbooks.get(i))
                    })
                    .cloned();
                if let Some(textbook) = textbook {
                    tracing::debug!(textbook = %textbook.id, "textbook selected");
                    self.selection.select_textbook(&textbook);
                    let has_experiments = !catalog.experiments_for(&textbook.id).is_empty();
                    self.experiment_list
                        .select(if has_experiments { Some(0) } else { None });
                }
            }
            View::Experiments => {
                let experiment = self.selection.textbook().and_then(|t| {
                    self.experiment_list
                        .selected()
                        .and_then(|i| catalog.experiments_for(&t.id).get(i))
                });
                if let Some(experiment) = experiment.cloned() {
                    self.select_experiment(catalog, &experiment);
                }
            }
            View::Lab => {}
        }
    }

    /// Choose a class directly (clears textbook and experiment)
    pub fn select_class(&mut self, catalog: &Catalog, id: &ClassId) {
        let Some(position) = catalog.classes().iter().position(|c| &c.id == id) else {
            return;
        };
        tracing::debug!(class = %id, "class selected");
        self.selection.select_class(id);
        self.class_list.select(Some(position));
        let has_textbooks = !catalog.classes()[position].textbooks.is_empty();
        self.textbook_list
            .select(if has_textbooks { Some(0) } else { None });
        self.lab.leave();
    }

    /// Open an experiment in the lab view; resets tab and simulation step
    pub fn select_experiment(&mut self, catalog: &Catalog, experiment: &Experiment) {
        tracing::debug!(experiment = %experiment.id, "experiment opened");
        self.selection.select_experiment(experiment);
        if self.selection.view() == View::Lab {
            self.lab.enter(&experiment.id, catalog);
        }
    }

    /// Step one level up the hierarchy
    pub fn back(&mut self) -> View {
        let was_lab = self.selection.view() == View::Lab;
        let view = self.selection.back();
        if was_lab {
            self.lab.leave();
        }
        view
    }

    /// Switch the lab tab. Returns true when the simulation tab needs a media lookup.
    pub fn set_tab(&mut self, tab: DetailTab) -> bool {
        if self.selection.view() != View::Lab {
            return false;
        }
        self.selection.set_tab(tab);
        self.lab.reset_scroll();
        tab == DetailTab::Simulation && self.lab.uses_media() && self.lab.media.is_idle()
    }
}

impl Component for NavigatorComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Keys shared by every level
        let shared = match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
                Some(Action::Back)
            }
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('f') => Some(Action::ToggleScreen),
            _ => None,
        };
        if shared.is_some() {
            return Ok(shared);
        }

        if self.selection.view() == View::Lab {
            return self.lab.handle_key_event(key);
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') => Some(Action::FirstItem),
            KeyCode::Char('G') => Some(Action::LastItem),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Some(Action::Select),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing needs the catalog; see draw_navigator
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════════

fn list_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Green } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border))
}

fn highlight_style() -> Style {
    Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Draw the class sidebar
pub fn draw_class_list(
    frame: &mut Frame,
    area: Rect,
    nav: &mut NavigatorComponent,
    catalog: &Catalog,
) {
    let chosen = nav.selection.class().cloned();
    let items: Vec<ListItem> = catalog
        .classes()
        .iter()
        .map(|class| {
            let is_chosen = chosen.as_ref() == Some(&class.id);
            let marker = if is_chosen { "● " } else { "○ " };
            let marker_style = if is_chosen {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let count: usize = class
                .textbooks
                .iter()
                .map(|t| catalog.experiments_for(&t.id).len())
                .sum();
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, marker_style),
                    Span::styled(
                        class.title.clone(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {} experiments", count),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let focused = nav.view() == View::Classes;
    let list = List::new(items)
        .block(list_block(" Select Class ".to_string(), focused))
        .highlight_style(highlight_style())
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut nav.class_list);
}

/// Draw the right pane for the current level
pub fn draw_navigator(
    frame: &mut Frame,
    area: Rect,
    nav: &mut NavigatorComponent,
    catalog: &Catalog,
) -> Result<()> {
    match nav.view() {
        View::Classes => render_welcome(frame, area, catalog),
        View::Textbooks => render_textbooks(frame, area, nav, catalog),
        View::Experiments => render_experiments(frame, area, nav, catalog),
        View::Lab => {
            let Some(experiment) = nav.selection.experiment().cloned() else {
                return Ok(());
            };
            let ctx = LabRenderContext {
                experiment: &experiment,
                detail: catalog.detail(&experiment.id),
                tab: nav.tab(),
                back_label: Some("Lab Experiments"),
            };
            draw_lab(frame, area, &mut nav.lab, &ctx)?;
        }
    }
    Ok(())
}

fn render_welcome(frame: &mut Frame, area: Rect, catalog: &Catalog) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Virtual Lab Collection",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "NCERT aligned virtual labs",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(format!(
            "{} classes · {} experiments",
            catalog.classes().len(),
            catalog.experiment_count()
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Pick a class on the left and press Enter",
            Style::default().fg(Color::Cyan),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(list_block(" Welcome ".to_string(), false))
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_textbooks(
    frame: &mut Frame,
    area: Rect,
    nav: &mut NavigatorComponent,
    catalog: &Catalog,
) {
    let Some(class) = nav.selection.class().and_then(|id| catalog.class(id)) else {
        return;
    };

    let items: Vec<ListItem> = class
        .textbooks
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    t.title.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} labs) →", catalog.experiments_for(&t.id).len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(list_block(format!(" {} - Textbooks ", class.title), true))
        .highlight_style(highlight_style())
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut nav.textbook_list);
}

fn render_experiments(
    frame: &mut Frame,
    area: Rect,
    nav: &mut NavigatorComponent,
    catalog: &Catalog,
) {
    let Some(textbook) = nav.selection.textbook().cloned() else {
        return;
    };
    let experiments = catalog.experiments_for(&textbook.id);
    let title = format!(" Lab Experiments - {} ", textbook.title);

    if experiments.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No labs available",
            Style::default().fg(Color::DarkGray),
        )))
        .block(list_block(title, true))
        .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = experiments
        .iter()
        .map(|e| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!(" {} ", e.category.label()),
                    Style::default()
                        .fg(Color::Black)
                        .bg(super::category_color(e.category))
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    e.title.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    if catalog.detail(&e.id).is_some() {
                        "Theory · Procedure · Simulation · Guide · Viva"
                    } else {
                        "Content coming soon"
                    },
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(list_block(title, true))
        .highlight_style(highlight_style())
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut nav.experiment_list);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaState;

    fn catalog() -> Catalog {
        Catalog::embedded().unwrap()
    }

    /// class-9 → NCERT Science Textbook → Onion Peel Cell Observation
    fn open_onion_peel(nav: &mut NavigatorComponent, catalog: &Catalog) {
        nav.select_class(catalog, &ClassId::new("class-9"));
        nav.select(catalog);
        nav.select(catalog);
    }

    #[test]
    fn test_drill_down_to_onion_peel() {
        let catalog = catalog();
        let mut nav = NavigatorComponent::new();

        nav.select_class(&catalog, &ClassId::new("class-9"));
        assert_eq!(nav.view(), View::Textbooks);

        nav.select(&catalog);
        assert_eq!(nav.view(), View::Experiments);
        assert_eq!(
            nav.selection.textbook().unwrap().title,
            "NCERT Science Textbook"
        );

        nav.select(&catalog);
        assert_eq!(nav.view(), View::Lab);
        assert_eq!(
            nav.selection.experiment().unwrap().title,
            "Onion Peel Cell Observation"
        );
        assert_eq!(nav.tab(), DetailTab::Theory);
        assert_eq!(nav.lab.steps.len(), 6);
    }

    #[test]
    fn test_cursor_then_select_class() {
        let catalog = catalog();
        let mut nav = NavigatorComponent::new();
        nav.next(&catalog);
        nav.next(&catalog);
        nav.select(&catalog);
        assert_eq!(nav.selection.class().unwrap().as_str(), "class-11");
    }

    #[test]
    fn test_cursor_wraps() {
        let catalog = catalog();
        let mut nav = NavigatorComponent::new();
        nav.previous(&catalog);
        nav.select(&catalog);
        assert_eq!(nav.selection.class().unwrap().as_str(), "class-12");
    }

    #[test]
    fn test_back_from_lab_returns_to_experiment_list() {
        let catalog = catalog();
        let mut nav = NavigatorComponent::new();
        open_onion_peel(&mut nav, &catalog);
        nav.set_tab(DetailTab::Procedure);

        assert_eq!(nav.back(), View::Experiments);
        assert!(nav.lab.experiment_id().is_none());
        assert_eq!(nav.tab(), DetailTab::Theory);
        assert_eq!(nav.back(), View::Textbooks);
        assert_eq!(nav.back(), View::Classes);
    }

    #[test]
    fn test_switching_experiment_resets_tab_and_step() {
        let catalog = catalog();
        let mut nav = NavigatorComponent::new();
        open_onion_peel(&mut nav, &catalog);
        nav.set_tab(DetailTab::Simulation);
        nav.lab.next_step();
        nav.lab.next_step();

        nav.back();
        nav.next(&catalog);
        nav.select(&catalog);

        assert_eq!(nav.selection.experiment().unwrap().id.as_str(), "plant-cells");
        assert_eq!(nav.tab(), DetailTab::Theory);
        assert_eq!(nav.lab.steps.index(), 0);
    }

    #[test]
    fn test_simulation_tab_requests_lookup_once() {
        let catalog = catalog();
        let mut nav = NavigatorComponent::new();
        open_onion_peel(&mut nav, &catalog);

        assert!(!nav.set_tab(DetailTab::Procedure));
        assert!(nav.set_tab(DetailTab::Simulation));

        nav.lab.media = MediaState::Ready {
            url: "https://media.test/onion-peel.mp4".to_string(),
        };
        nav.set_tab(DetailTab::Theory);
        assert!(!nav.set_tab(DetailTab::Simulation));
    }

    #[test]
    fn test_selecting_class_closes_lab() {
        let catalog = catalog();
        let mut nav = NavigatorComponent::new();
        open_onion_peel(&mut nav, &catalog);

        nav.select_class(&catalog, &ClassId::new("class-12"));
        assert_eq!(nav.view(), View::Textbooks);
        assert!(nav.lab.experiment_id().is_none());
    }

    #[test]
    fn test_lab_keys_delegate_to_viewer() {
        let catalog = catalog();
        let mut nav = NavigatorComponent::new();
        open_onion_peel(&mut nav, &catalog);

        let key = |c| KeyEvent::new(KeyCode::Char(c), crossterm::event::KeyModifiers::NONE);
        assert_eq!(nav.handle_key_event(key('n')).unwrap(), Some(Action::NextStep));
        assert_eq!(nav.handle_key_event(key('j')).unwrap(), Some(Action::ScrollDown));
        assert_eq!(nav.handle_key_event(key('h')).unwrap(), Some(Action::Back));
    }

    #[test]
    fn test_list_keys_outside_lab() {
        let mut nav = NavigatorComponent::new();
        let key = |code| KeyEvent::new(code, crossterm::event::KeyModifiers::NONE);
        assert_eq!(nav.handle_key_event(key(KeyCode::Down)).unwrap(), Some(Action::NextItem));
        assert_eq!(nav.handle_key_event(key(KeyCode::Enter)).unwrap(), Some(Action::Select));
        assert_eq!(nav.handle_key_event(key(KeyCode::Char('n'))).unwrap(), None);
    }
}
