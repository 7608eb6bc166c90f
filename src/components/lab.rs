//! Lab detail viewer
//!
//! Renders one experiment as five tabs (theory, procedure, simulation, guide,
//! viva) and owns the simulation step counter and media state for it.
//! Missing catalog content degrades to placeholder text.

use super::calculate_lab_layout;
use super::simulation::draw_simulation;
use crate::action::Action;
use crate::component::Component;
use crate::model::{
    Catalog, DetailTab, Experiment, ExperimentDetail, ExperimentId, FinishBehavior, MediaState,
    SimulationStepState, StepOutcome,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Tabs},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const THEORY_PLACEHOLDER: &str = "Theory content will appear here...";
pub const PROCEDURE_PLACEHOLDER: &str = "Procedure content will appear here...";
pub const GUIDE_PLACEHOLDER: &str = "Experiment guide will appear here...";
pub const VIVA_PLACEHOLDER: &str = "Viva questions will appear here...";

/// Which screen the viewer is embedded in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabVariant {
    /// Catalog drill-down: simulation tab resolves a video, last step is a no-op
    Catalog,
    /// Featured labs: step controller only, last step signals finish
    Featured,
}

/// Lab viewer state for the open experiment
pub struct LabComponent {
    variant: LabVariant,
    experiment: Option<ExperimentId>,
    pub steps: SimulationStepState,
    pub media: MediaState,
    scroll: usize,
    /// Display rows of the current tab after wrapping
    content_len: usize,
    /// Rows visible in the tab body at the last draw
    viewport: usize,
}

impl LabComponent {
    pub fn new(variant: LabVariant) -> Self {
        let finish = match variant {
            LabVariant::Catalog => FinishBehavior::Stop,
            LabVariant::Featured => FinishBehavior::Signal,
        };
        Self {
            variant,
            experiment: None,
            steps: SimulationStepState::new(0, finish),
            media: MediaState::Idle,
            scroll: 0,
            content_len: 0,
            viewport: 0,
        }
    }

    /// Whether the simulation tab shows resolved media
    pub fn uses_media(&self) -> bool {
        self.variant == LabVariant::Catalog
    }

    pub fn experiment_id(&self) -> Option<&ExperimentId> {
        self.experiment.as_ref()
    }

    /// Open an experiment: step 0, no media, top of content
    pub fn enter(&mut self, experiment: &ExperimentId, catalog: &Catalog) {
        self.experiment = Some(experiment.clone());
        self.steps.reset(catalog.procedure_len(experiment));
        self.media = MediaState::Idle;
        self.scroll = 0;
    }

    pub fn leave(&mut self) {
        self.experiment = None;
        self.steps.reset(0);
        self.media = MediaState::Idle;
        self.scroll = 0;
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    /// Largest scroll offset that still fills the viewport
    fn max_scroll(&self) -> usize {
        self.content_len.saturating_sub(self.viewport.max(1))
    }

    pub fn next_step(&mut self) -> StepOutcome {
        self.steps.next()
    }

    pub fn previous_step(&mut self) -> StepOutcome {
        self.steps.previous()
    }
}

impl Component for LabComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char(c @ '1'..='5') => c
                .to_digit(10)
                .and_then(DetailTab::from_number)
                .map(Action::SelectTab),

            KeyCode::Char('n') => Some(Action::NextStep),
            KeyCode::Char('p') => Some(Action::PrevStep),
            KeyCode::Char('r') => Some(Action::RetryMedia),
            KeyCode::Char('o') => Some(Action::OpenMedia),

            KeyCode::Char('e') if ctrl => Some(Action::ScrollDown),
            KeyCode::Char('y') if ctrl => Some(Action::ScrollUp),
            KeyCode::Char('d') if ctrl => Some(Action::PageDown),
            KeyCode::Char('u') if ctrl => Some(Action::PageUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let max_scroll = self.max_scroll();
        match action {
            Action::ScrollDown => {
                if self.scroll < max_scroll {
                    self.scroll += 1;
                }
            }
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::PageDown => self.scroll = (self.scroll + 10).min(max_scroll),
            Action::PageUp => self.scroll = self.scroll.saturating_sub(10),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing needs the experiment record; see draw_lab
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════════

/// Data needed to render the open experiment
pub struct LabRenderContext<'a> {
    pub experiment: &'a Experiment,
    pub detail: Option<&'a ExperimentDetail>,
    pub tab: DetailTab,
    /// Hint for the back key, `None` when there is nowhere to go back to
    pub back_label: Option<&'a str>,
}

pub fn draw_lab(
    frame: &mut Frame,
    area: Rect,
    lab: &mut LabComponent,
    ctx: &LabRenderContext,
) -> Result<()> {
    let layout = calculate_lab_layout(area);

    render_header(frame, layout.header, ctx);
    render_tabs(frame, layout.tabs, ctx.tab);

    if ctx.tab == DetailTab::Simulation {
        draw_simulation(frame, layout.body, lab, ctx.experiment, ctx.detail);
        return Ok(());
    }

    // Wrapped up front so scrolling counts display rows
    let text_width = layout.body.width.saturating_sub(2) as usize;
    let lines = wrap_lines(tab_lines(ctx.tab, ctx.detail), text_width);
    let total = lines.len();
    let visible_height = layout.body.height.saturating_sub(2) as usize;
    lab.content_len = total;
    lab.viewport = visible_height;
    lab.scroll = lab.scroll.min(lab.max_scroll());

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", ctx.tab.name()))
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .scroll((lab.scroll as u16, 0));
    frame.render_widget(paragraph, layout.body);

    if total > visible_height {
        let mut scrollbar_state = ScrollbarState::new(lab.max_scroll()).position(lab.scroll);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓")),
            layout.body.inner(ratatui::layout::Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }

    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, ctx: &LabRenderContext) {
    let mut lines = Vec::new();

    if let Some(label) = ctx.back_label {
        lines.push(Line::from(vec![
            Span::styled(
                " Esc ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("← {}", label), Style::default().fg(Color::DarkGray)),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled(
            ctx.experiment.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} LAB ", ctx.experiment.category.label()),
            Style::default()
                .fg(Color::Black)
                .bg(super::category_color(ctx.experiment.category))
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, area: Rect, active: DetailTab) {
    let titles: Vec<String> = DetailTab::all()
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {}", i + 1, t.name()))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(active.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Text content for the non-simulation tabs
pub fn tab_lines(tab: DetailTab, detail: Option<&ExperimentDetail>) -> Vec<Line<'static>> {
    match tab {
        DetailTab::Theory => {
            let text = detail.and_then(|d| d.theory.clone());
            vec![text_or_placeholder(text, THEORY_PLACEHOLDER)]
        }
        DetailTab::Procedure => procedure_lines(detail),
        DetailTab::Guide => {
            let text = detail.and_then(|d| d.guide.clone());
            vec![text_or_placeholder(text, GUIDE_PLACEHOLDER)]
        }
        DetailTab::Viva => viva_lines(detail),
        DetailTab::Simulation => Vec::new(),
    }
}

/// Word-wrap styled lines to `width` columns.
///
/// Leading indentation is kept on the first row of each line; continuation
/// rows start at the next word. Words wider than `width` are split.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }

    let mut rows = Vec::new();
    for line in lines {
        let line_style = line.style;
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut row_width = 0;
        let mut wrapped = false;

        for span in &line.spans {
            for piece in span.content.split_inclusive(' ') {
                if row_width > 0 && row_width + piece.trim_end().width() > width {
                    rows.push(Line::from(std::mem::take(&mut row)).style(line_style));
                    row_width = 0;
                    wrapped = true;
                }
                let piece = if wrapped && row_width == 0 {
                    piece.trim_start()
                } else {
                    piece
                };
                if piece.is_empty() {
                    continue;
                }

                if piece.trim_end().width() <= width {
                    row_width += piece.width();
                    row.push(Span::styled(piece.to_string(), span.style));
                    continue;
                }

                let mut chunk = String::new();
                for c in piece.chars() {
                    let w = c.width().unwrap_or(0);
                    if row_width > 0 && row_width + w > width {
                        if !chunk.is_empty() {
                            row.push(Span::styled(std::mem::take(&mut chunk), span.style));
                        }
                        rows.push(Line::from(std::mem::take(&mut row)).style(line_style));
                        row_width = 0;
                        wrapped = true;
                        if c == ' ' {
                            continue;
                        }
                    }
                    chunk.push(c);
                    row_width += w;
                }
                if !chunk.is_empty() {
                    row.push(Span::styled(chunk, span.style));
                }
            }
        }

        if !row.is_empty() || !wrapped {
            rows.push(Line::from(row).style(line_style));
        }
    }
    rows
}

fn text_or_placeholder(text: Option<String>, placeholder: &'static str) -> Line<'static> {
    match text {
        Some(text) => Line::from(text),
        None => Line::from(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        )),
    }
}

fn section_heading(title: &'static str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ]
}

fn procedure_lines(detail: Option<&ExperimentDetail>) -> Vec<Line<'static>> {
    let steps = detail.map(|d| d.procedure.as_slice()).unwrap_or(&[]);
    if steps.is_empty() {
        return vec![text_or_placeholder(None, PROCEDURE_PLACEHOLDER)];
    }

    let mut lines = section_heading("Procedure Steps");
    for (i, step) in steps.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>2}. ", i + 1),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(step.clone()),
        ]));
    }
    lines
}

fn viva_lines(detail: Option<&ExperimentDetail>) -> Vec<Line<'static>> {
    let questions = detail.map(|d| d.viva.as_slice()).unwrap_or(&[]);
    if questions.is_empty() {
        return vec![text_or_placeholder(None, VIVA_PLACEHOLDER)];
    }

    let mut lines = section_heading("Viva Voce Questions");
    for (i, viva) in questions.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("Q{}: {}", i + 1, viva.question),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("    A: {}", viva.answer),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(""));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn catalog() -> Catalog {
        Catalog::embedded().unwrap()
    }

    #[test]
    fn test_onion_peel_procedure_has_six_ordered_steps() {
        let catalog = catalog();
        let detail = catalog.detail(&ExperimentId::new("onion-peel"));
        let lines: Vec<String> = tab_lines(DetailTab::Procedure, detail)
            .iter()
            .map(line_text)
            .collect();

        let steps: Vec<&String> = lines
            .iter()
            .filter(|l| l.trim_start().chars().next().is_some_and(|c| c.is_ascii_digit()))
            .collect();
        assert_eq!(steps.len(), 6);
        assert_eq!(
            steps[0].trim_start(),
            "1. Take a fresh onion bulb and cut it into layers."
        );
        assert!(steps[5].trim_start().starts_with("6. Observe the slide"));
    }

    #[test]
    fn test_onion_peel_viva_lists_question_and_answer() {
        let catalog = catalog();
        let detail = catalog.detail(&ExperimentId::new("onion-peel"));
        let lines: Vec<String> = tab_lines(DetailTab::Viva, detail)
            .iter()
            .map(line_text)
            .collect();

        let q = lines
            .iter()
            .position(|l| l.ends_with("What is the shape of onion peel cells?"))
            .unwrap();
        assert_eq!(lines[q + 1].trim(), "A: Rectangular");
    }

    #[test]
    fn test_missing_detail_uses_placeholders() {
        for (tab, placeholder) in [
            (DetailTab::Theory, THEORY_PLACEHOLDER),
            (DetailTab::Procedure, PROCEDURE_PLACEHOLDER),
            (DetailTab::Guide, GUIDE_PLACEHOLDER),
            (DetailTab::Viva, VIVA_PLACEHOLDER),
        ] {
            let lines = tab_lines(tab, None);
            assert_eq!(lines.len(), 1);
            assert_eq!(line_text(&lines[0]), placeholder);
        }
    }

    #[test]
    fn test_enter_resets_steps_and_media() {
        let catalog = catalog();
        let mut lab = LabComponent::new(LabVariant::Catalog);
        lab.enter(&ExperimentId::new("onion-peel"), &catalog);
        lab.next_step();
        lab.next_step();
        lab.media = MediaState::NotFound {
            key: "onion-peel.mp4".to_string(),
        };

        lab.enter(&ExperimentId::new("mitosis"), &catalog);
        assert_eq!(lab.steps.index(), 0);
        assert_eq!(lab.steps.len(), 6);
        assert!(lab.media.is_idle());
    }

    #[test]
    fn test_featured_variant_signals_finish() {
        let catalog = catalog();
        let mut lab = LabComponent::new(LabVariant::Featured);
        lab.enter(&ExperimentId::new("dna-extract"), &catalog);
        for _ in 0..4 {
            assert_eq!(lab.next_step(), StepOutcome::Moved);
        }
        assert_eq!(lab.next_step(), StepOutcome::Finished);
        assert!(!lab.uses_media());
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut lab = LabComponent::new(LabVariant::Catalog);
        lab.content_len = 3;
        for _ in 0..10 {
            lab.update(Action::ScrollDown).unwrap();
        }
        assert_eq!(lab.scroll, 2);
        lab.update(Action::PageUp).unwrap();
        assert_eq!(lab.scroll, 0);
    }

    #[test]
    fn test_wrap_lines_keeps_words_and_indent() {
        let lines = vec![
            Line::from("    A: Rectangular cells"),
            Line::from(""),
            Line::from("abcdefghijkl"),
        ];
        let rows: Vec<String> = wrap_lines(lines, 10).iter().map(line_text).collect();
        assert_eq!(
            rows,
            vec!["    A: ", "Rectangula", "r cells", "", "abcdefghij", "kl"]
        );
    }

    #[test]
    fn test_wrapped_theory_scrolls_to_last_word() {
        let catalog = catalog();
        let experiment = catalog.experiment(&ExperimentId::new("onion-peel")).unwrap();
        let mut lab = LabComponent::new(LabVariant::Catalog);
        lab.enter(&experiment.id, &catalog);

        let ctx = LabRenderContext {
            experiment,
            detail: catalog.detail(&experiment.id),
            tab: DetailTab::Theory,
            back_label: None,
        };
        let mut terminal = Terminal::new(TestBackend::new(40, 14)).unwrap();
        let mut render = |lab: &mut LabComponent| -> String {
            terminal
                .draw(|frame| {
                    draw_lab(frame, frame.area(), lab, &ctx).unwrap();
                })
                .unwrap();
            terminal
                .backend()
                .buffer()
                .content()
                .iter()
                .map(|c| c.symbol())
                .collect()
        };

        assert!(!render(&mut lab).contains("microscope."));
        assert!(lab.content_len > lab.viewport);

        for _ in 0..50 {
            lab.update(Action::ScrollDown).unwrap();
        }
        assert_eq!(lab.scroll, lab.content_len - lab.viewport);
        assert!(render(&mut lab).contains("microscope."));
    }

    #[test]
    fn test_number_keys_select_tabs() {
        let mut lab = LabComponent::new(LabVariant::Catalog);
        let action = lab
            .handle_key_event(KeyEvent::new(KeyCode::Char('5'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(action, Some(Action::SelectTab(DetailTab::Viva)));
        let action = lab
            .handle_key_event(KeyEvent::new(KeyCode::Char('9'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn test_draw_procedure_tab_renders_steps() {
        let catalog = catalog();
        let experiment = catalog.experiment(&ExperimentId::new("onion-peel")).unwrap();
        let mut lab = LabComponent::new(LabVariant::Catalog);
        lab.enter(&experiment.id, &catalog);

        let ctx = LabRenderContext {
            experiment,
            detail: catalog.detail(&experiment.id),
            tab: DetailTab::Procedure,
            back_label: Some("Lab Experiments"),
        };

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|frame| {
                draw_lab(frame, frame.area(), &mut lab, &ctx).unwrap();
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Onion Peel Cell Observation"));
        assert!(text.contains("MICROSCOPY LAB"));
        assert!(text.contains("1. Take a fresh onion bulb and cut it into layers."));
        assert!(text.contains("6. Observe the slide under low power"));
    }
}
