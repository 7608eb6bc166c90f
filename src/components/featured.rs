//! Featured labs screen
//!
//! A short list of highlighted experiments opened directly in the lab viewer,
//! without the class and textbook levels. The simulation tab is a step
//! controller only; finishing the last step is reported to the app.

use super::lab::{draw_lab, LabComponent, LabRenderContext, LabVariant};
use crate::action::Action;
use crate::component::Component;
use crate::model::{Catalog, DetailTab, ExperimentId};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub struct FeaturedComponent {
    labs: Vec<ExperimentId>,
    list: ListState,
    tab: DetailTab,
    pub lab: LabComponent,
}

impl FeaturedComponent {
    pub fn new(catalog: &Catalog) -> Self {
        let labs: Vec<ExperimentId> = catalog.featured().iter().map(|e| e.id.clone()).collect();
        let mut component = Self {
            labs,
            list: ListState::default(),
            tab: DetailTab::Theory,
            lab: LabComponent::new(LabVariant::Featured),
        };
        component.open(0, catalog);
        component
    }

    pub fn labs(&self) -> &[ExperimentId] {
        &self.labs
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn selected(&self) -> Option<&ExperimentId> {
        self.list.selected().and_then(|i| self.labs.get(i))
    }

    /// Open the lab at `index`; tab and step start over
    fn open(&mut self, index: usize, catalog: &Catalog) {
        let Some(id) = self.labs.get(index).cloned() else {
            self.list.select(None);
            return;
        };
        tracing::debug!(experiment = %id, "featured lab opened");
        self.list.select(Some(index));
        self.tab = DetailTab::Theory;
        self.lab.enter(&id, catalog);
    }

    pub fn next_lab(&mut self, catalog: &Catalog) {
        if self.labs.is_empty() {
            return;
        }
        let i = self
            .list
            .selected()
            .map(|i| (i + 1) % self.labs.len())
            .unwrap_or(0);
        self.open(i, catalog);
    }

    pub fn previous_lab(&mut self, catalog: &Catalog) {
        if self.labs.is_empty() {
            return;
        }
        let i = match self.list.selected() {
            Some(0) | None => self.labs.len() - 1,
            Some(i) => i - 1,
        };
        self.open(i, catalog);
    }

    pub fn set_tab(&mut self, tab: DetailTab) {
        if self.selected().is_some() {
            self.tab = tab;
            self.lab.reset_scroll();
        }
    }
}

impl Component for FeaturedComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('f') => Some(Action::ToggleScreen),
            KeyCode::Char('J') => Some(Action::NextItem),
            KeyCode::Char('K') => Some(Action::PrevItem),
            KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Action::NextItem),
            KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Action::PrevItem),
            _ => return self.lab.handle_key_event(key),
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        Ok(())
    }
}

/// Draw the featured list into `sidebar` and the open lab into `content`
pub fn draw_featured(
    frame: &mut Frame,
    sidebar: Rect,
    content: Rect,
    featured: &mut FeaturedComponent,
    catalog: &Catalog,
) -> Result<()> {
    let items: Vec<ListItem> = featured
        .labs()
        .iter()
        .filter_map(|id| catalog.experiment(id))
        .map(|e| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    e.title.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", e.category.label()),
                    Style::default().fg(super::category_color(e.category)),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Featured Labs ")
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, sidebar, &mut featured.list);

    let Some(experiment) = featured.selected().and_then(|id| catalog.experiment(id)) else {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No featured labs",
            Style::default().fg(Color::DarkGray),
        )))
        .block(Block::default().borders(Borders::ALL))
        .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(empty, content);
        return Ok(());
    };

    let ctx = LabRenderContext {
        experiment,
        detail: catalog.detail(&experiment.id),
        tab: featured.tab,
        back_label: None,
    };
    draw_lab(frame, content, &mut featured.lab, &ctx)
}
