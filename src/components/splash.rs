//! Splash screen shown while the app starts

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const GLASS: Color = Color::Rgb(120, 200, 255);
const LIQUID: Color = Color::Rgb(80, 220, 120);

pub struct SplashComponent {
    start_time: Option<Instant>,
    duration: Duration,
}

impl Default for SplashComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashComponent {
    pub fn new() -> Self {
        Self {
            start_time: None,
            duration: Duration::from_millis(1500),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.start_time
            .map(|t| t.elapsed() >= self.duration)
            .unwrap_or(false)
    }

    /// Conical flask; `~` is liquid
    fn logo() -> [&'static str; 9] {
        [
            "     ┌─────┐     ",
            "     │     │     ",
            "     │     │     ",
            "    ╱       ╲    ",
            "   ╱         ╲   ",
            "  ╱ ~~~~~~~~~ ╲  ",
            " ╱ ~~~~~~~~~~~ ╲ ",
            "╱ ~~~~~~~~~~~~~ ╲",
            "└───────────────┘",
        ]
    }
}

/// Columns of `area` holding a block `width` wide, centered horizontally
fn centered_columns(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height)
}

impl Component for SplashComponent {
    fn init(&mut self) -> Result<()> {
        self.start_time = Some(Instant::now());
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('q') => Ok(Some(Action::ForceQuit)),
            _ => Ok(Some(Action::SplashComplete)),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick && self.is_complete() {
            return Ok(Some(Action::SplashComplete));
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let bg = Color::Rgb(0, 0, 0);
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(bg)), area);

        let logo = Self::logo();
        let logo_height = logo.len() as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(area.height.saturating_sub(logo_height + 4) / 2),
                Constraint::Length(logo_height),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        // Layout chunks never extend past `area`, so short terminals just clip
        let logo_lines: Vec<Line> = logo
            .iter()
            .map(|line| {
                let spans: Vec<Span> = line
                    .chars()
                    .map(|c| {
                        let fg = if c == '~' { LIQUID } else { GLASS };
                        Span::styled(c.to_string(), Style::default().fg(fg).bg(bg))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        let logo_width = logo.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        frame.render_widget(
            Paragraph::new(logo_lines),
            centered_columns(chunks[1], logo_width),
        );

        let title = Line::from(vec![
            Span::styled(
                "virtual",
                Style::default()
                    .fg(GLASS)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "-lab",
                Style::default()
                    .fg(LIQUID)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(title).alignment(Alignment::Center),
            chunks[3],
        );

        frame.render_widget(
            Paragraph::new(Span::styled(
                "NCERT science labs in your terminal",
                Style::default().fg(Color::DarkGray).bg(bg),
            ))
            .alignment(Alignment::Center),
            chunks[4],
        );

        Ok(())
    }
}
