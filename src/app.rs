//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! App coordinates the screens, the modal stack and the background media
//! lookup; lab and navigation rules live in the components and model.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, draw_class_list, draw_featured, draw_navigator, FeaturedComponent,
    HelpDialog, LabComponent, NavigatorComponent, QuitDialog, SplashComponent,
};
use crate::config::{Config, StartScreen};
use crate::model::{
    AppMode, Catalog, DetailTab, Modal, ModalStack, Screen, StepOutcome, View,
};
use crate::services::{resolver_from_config, MediaLookup, MediaResolver};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    pub mode: AppMode,

    /// Screen currently shown
    pub screen: Screen,

    /// Immutable curriculum table
    pub catalog: Catalog,

    pub config: Config,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Background media lookup for the catalog lab viewer
    pub lookup: MediaLookup,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: Option<String>,

    /// Media URL to hand to the system opener (handled by main loop)
    pub pending_open_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub splash: SplashComponent,
    pub navigator: NavigatorComponent,
    pub featured: FeaturedComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(catalog: Catalog, config: Config) -> App {
        let resolver = resolver_from_config(&config);
        Self::with_resolver(catalog, config, resolver)
    }

    pub fn with_resolver(
        catalog: Catalog,
        config: Config,
        resolver: Arc<dyn MediaResolver>,
    ) -> App {
        let screen = match config.start_screen {
            StartScreen::Catalog => Screen::Catalog,
            StartScreen::Featured => Screen::Featured,
        };
        let featured = FeaturedComponent::new(&catalog);

        App {
            mode: AppMode::Splash,
            screen,
            catalog,
            config,
            modals: ModalStack::new(),
            lookup: MediaLookup::new(resolver),
            should_quit: false,
            status_message: None,
            pending_open_url: None,
            splash: SplashComponent::new(),
            navigator: NavigatorComponent::new(),
            featured,
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
        }
    }

    /// Lab viewer and tab of the active screen, if a lab is open there
    fn active_lab(&mut self) -> Option<(&mut LabComponent, DetailTab)> {
        match self.screen {
            Screen::Catalog if self.navigator.view() == View::Lab => {
                let tab = self.navigator.tab();
                Some((&mut self.navigator.lab, tab))
            }
            Screen::Catalog => None,
            Screen::Featured => {
                let tab = self.featured.tab();
                self.featured
                    .selected()
                    .is_some()
                    .then_some((&mut self.featured.lab, tab))
            }
        }
    }

    fn active_tab(&self) -> Option<DetailTab> {
        match self.screen {
            Screen::Catalog if self.navigator.view() == View::Lab => Some(self.navigator.tab()),
            Screen::Catalog => None,
            Screen::Featured => self.featured.selected().map(|_| self.featured.tab()),
        }
    }

    fn set_tab(&mut self, tab: DetailTab) {
        match self.screen {
            Screen::Catalog => {
                if self.navigator.set_tab(tab) {
                    self.start_lookup();
                }
            }
            Screen::Featured => self.featured.set_tab(tab),
        }
    }

    /// Resolve media for the experiment open in the catalog lab
    fn start_lookup(&mut self) {
        if let Some(id) = self.navigator.lab.experiment_id().cloned() {
            self.navigator.lab.media = self.lookup.spawn(&id);
        }
    }

    /// Drop a lookup whose experiment is no longer open
    fn sync_lookup(&mut self) {
        if self.lookup.is_pending() && self.navigator.lab.experiment_id().is_none() {
            self.lookup.cancel();
        }
    }

    fn step(&mut self, forward: bool) {
        let Some((lab, DetailTab::Simulation)) = self.active_lab() else {
            return;
        };
        let outcome = if forward {
            lab.next_step()
        } else {
            lab.previous_step()
        };
        if outcome == StepOutcome::Finished {
            let title = self
                .featured
                .selected()
                .and_then(|id| self.catalog.experiment(id))
                .map(|e| e.title.clone())
                .unwrap_or_default();
            tracing::info!(lab = %title, "featured lab finished");
            self.status_message = Some(format!("✓ {} complete", title));
        }
    }
}

impl Component for App {
    fn init(&mut self) -> Result<()> {
        tracing::info!(
            classes = self.catalog.classes().len(),
            experiments = self.catalog.experiment_count(),
            screen = self.screen.name(),
            "app started"
        );
        self.splash.init()?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.mode {
            AppMode::Splash => self.splash.handle_key_event(key),
            AppMode::Running => {
                if let Some(modal) = self.modals.top().cloned() {
                    self.handle_modal_key_event(&modal, key)
                } else {
                    match self.screen {
                        Screen::Catalog => self.navigator.handle_key_event(key),
                        Screen::Featured => self.featured.handle_key_event(key),
                    }
                }
            }
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if !matches!(action, Action::Tick | Action::Resize(_, _)) {
            tracing::debug!(%action, "update");
            self.status_message = None;
        }

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if self.mode == AppMode::Splash {
                    return self.splash.update(action);
                }
                let current = self.navigator.lab.experiment_id().cloned();
                self.lookup
                    .poll(current.as_ref(), &mut self.navigator.lab.media);
            }
            Action::SplashComplete => {
                self.mode = AppMode::Running;
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem => match self.screen {
                Screen::Catalog => self.navigator.next(&self.catalog),
                Screen::Featured => self.featured.next_lab(&self.catalog),
            },
            Action::PrevItem => match self.screen {
                Screen::Catalog => self.navigator.previous(&self.catalog),
                Screen::Featured => self.featured.previous_lab(&self.catalog),
            },
            Action::FirstItem => self.navigator.select_first(&self.catalog),
            Action::LastItem => self.navigator.select_last(&self.catalog),
            Action::Select => {
                let was_lab = self.navigator.view() == View::Lab;
                self.navigator.select(&self.catalog);
                // A newly opened experiment starts from Idle media
                if !was_lab && self.navigator.view() == View::Lab {
                    self.lookup.cancel();
                }
            }
            Action::Back => {
                self.navigator.back();
                self.sync_lookup();
            }
            Action::ToggleScreen => {
                self.screen = self.screen.toggled();
                tracing::debug!(screen = self.screen.name(), "screen switched");
            }

            // ─────────────────────────────────────────────────────────────────
            // Lab View
            // ─────────────────────────────────────────────────────────────────
            Action::NextTab => {
                if let Some(tab) = self.active_tab() {
                    self.set_tab(tab.next());
                }
            }
            Action::PrevTab => {
                if let Some(tab) = self.active_tab() {
                    self.set_tab(tab.previous());
                }
            }
            Action::SelectTab(tab) => self.set_tab(tab),
            Action::NextStep => self.step(true),
            Action::PrevStep => self.step(false),
            Action::RetryMedia => {
                if self.screen == Screen::Catalog
                    && self.active_tab() == Some(DetailTab::Simulation)
                    && self.navigator.lab.media.can_retry()
                {
                    tracing::info!("retrying media lookup");
                    self.start_lookup();
                }
            }
            Action::OpenMedia => {
                if self.screen == Screen::Catalog
                    && self.active_tab() == Some(DetailTab::Simulation)
                {
                    self.pending_open_url = self.navigator.lab.media.url().map(str::to_string);
                }
            }
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                if self.modals.top() == Some(&Modal::Help) {
                    self.help_dialog.update(action)?;
                } else if let Some((lab, _)) = self.active_lab() {
                    lab.update(action)?;
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Splash => self.splash.draw(frame, area)?,
            AppMode::Running => {
                self.draw_screen(frame, area)?;

                if let Some(modal) = self.modals.top().cloned() {
                    match modal {
                        Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
                        Modal::Help => self.help_dialog.draw(frame, area)?,
                    }
                }
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_screen(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area, self.status_message.is_some());

        frame.render_widget(Paragraph::new(self.header_line()), layout.header);

        match self.screen {
            Screen::Catalog => {
                draw_class_list(frame, layout.sidebar, &mut self.navigator, &self.catalog);
                draw_navigator(frame, layout.content, &mut self.navigator, &self.catalog)?;
            }
            Screen::Featured => {
                draw_featured(
                    frame,
                    layout.sidebar,
                    layout.content,
                    &mut self.featured,
                    &self.catalog,
                )?;
            }
        }

        if let (Some(status_area), Some(message)) = (layout.status, &self.status_message) {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", message),
                    Style::default().fg(Color::Green),
                )),
                status_area,
            );
        }

        frame.render_widget(Paragraph::new(self.help_line()), layout.help);
        Ok(())
    }

    fn header_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            " virtual-lab ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )];

        for screen in [Screen::Catalog, Screen::Featured] {
            let style = if screen == self.screen {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(screen.name(), style));
        }

        if self.screen == Screen::Catalog {
            let mut crumbs = Vec::new();
            if let Some(class) = self
                .navigator
                .selection
                .class()
                .and_then(|id| self.catalog.class(id))
            {
                crumbs.push(class.title.clone());
            }
            if let Some(textbook) = self.navigator.selection.textbook() {
                crumbs.push(textbook.title.clone());
            }
            if let Some(experiment) = self.navigator.selection.experiment() {
                crumbs.push(experiment.title.clone());
            }
            if !crumbs.is_empty() {
                spans.push(Span::styled(
                    format!("   {}", crumbs.join(" › ")),
                    Style::default().fg(Color::Cyan),
                ));
            }
        }

        Line::from(spans)
    }

    fn help_line(&self) -> Line<'static> {
        let keys: &[(&str, &str)] = match (self.screen, self.active_tab()) {
            (Screen::Catalog, Some(DetailTab::Simulation)) => &[
                ("n/p", "step"),
                ("Tab", "tab"),
                ("r", "retry"),
                ("o", "open video"),
                ("Esc", "back"),
                ("f", "screen"),
                ("?", "help"),
                ("q", "quit"),
            ],
            // No media panel here
            (Screen::Featured, Some(DetailTab::Simulation)) => &[
                ("n/p", "step"),
                ("Tab", "tab"),
                ("J/K", "lab"),
                ("f", "screen"),
                ("?", "help"),
                ("q", "quit"),
            ],
            (_, Some(_)) => &[
                ("1-5", "tab"),
                ("j/k", "scroll"),
                ("Esc", "back"),
                ("f", "screen"),
                ("?", "help"),
                ("q", "quit"),
            ],
            (Screen::Featured, None) => &[("J/K", "lab"), ("f", "screen"), ("q", "quit")],
            (Screen::Catalog, None) => &[
                ("j/k", "move"),
                ("Enter", "open"),
                ("Esc", "back"),
                ("f", "featured"),
                ("?", "help"),
                ("q", "quit"),
            ],
        };

        let spans: Vec<Span> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(
                        format!(" {} ", key),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("{}  ", label), Style::default().fg(Color::DarkGray)),
                ]
            })
            .collect();
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExperimentId, MediaState};
    use crate::services::{OfflineResolver, Resolution};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::{Duration, Instant};

    struct FoundResolver;

    impl MediaResolver for FoundResolver {
        fn resolve(&self, experiment: &ExperimentId) -> Resolution {
            Resolution::Found(format!("https://media.test/{}.mp4", experiment))
        }
    }

    fn app_with(resolver: Arc<dyn MediaResolver>) -> App {
        let catalog = Catalog::embedded().unwrap();
        let mut app = App::with_resolver(catalog, Config::default(), resolver);
        app.update(Action::SplashComplete).unwrap();
        app
    }

    fn app() -> App {
        app_with(Arc::new(OfflineResolver))
    }

    fn press(app: &mut App, code: KeyCode) {
        let action = app
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
        let mut current = action;
        while let Some(a) = current {
            current = app.update(a).unwrap();
        }
    }

    /// Tick until the lookup settles or a second passes
    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(1);
        while app.navigator.lab.media.is_loading() && Instant::now() < deadline {
            app.update(Action::Tick).unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|frame| {
                app.draw(frame, frame.area()).unwrap();
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    /// class-9 → first textbook → first experiment, via keys
    fn open_onion_peel(app: &mut App) {
        press(app, KeyCode::Enter);
        press(app, KeyCode::Enter);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_scenario_onion_peel_procedure_and_viva() {
        let mut app = app();
        open_onion_peel(&mut app);
        assert_eq!(app.navigator.view(), View::Lab);

        press(&mut app, KeyCode::Char('2'));
        let text = screen_text(&mut app);
        assert!(text.contains("Onion Peel Cell Observation"));
        assert!(text.contains("1. Take a fresh onion bulb and cut it into layers."));
        assert!(text.contains("6. Observe the slide under low power"));

        press(&mut app, KeyCode::Char('5'));
        let text = screen_text(&mut app);
        assert!(text.contains("Q1: What is the shape of onion peel cells?"));
        assert!(text.contains("A: Rectangular"));
    }

    #[test]
    fn test_simulation_tab_resolves_media() {
        let mut app = app_with(Arc::new(FoundResolver));
        open_onion_peel(&mut app);

        press(&mut app, KeyCode::Char('3'));
        assert!(app.navigator.lab.media.is_loading());
        settle(&mut app);
        assert_eq!(
            app.navigator.lab.media.url(),
            Some("https://media.test/onion-peel.mp4")
        );

        press(&mut app, KeyCode::Char('o'));
        assert_eq!(
            app.pending_open_url.as_deref(),
            Some("https://media.test/onion-peel.mp4")
        );
    }

    #[test]
    fn test_missing_media_then_scoped_retry() {
        let mut app = app();
        open_onion_peel(&mut app);
        press(&mut app, KeyCode::Char('3'));
        settle(&mut app);
        assert_eq!(
            app.navigator.lab.media,
            MediaState::NotFound {
                key: "onion-peel.mp4".to_string()
            }
        );
        assert!(screen_text(&mut app).contains("Video Not Found"));

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('r'));
        assert!(app.navigator.lab.media.is_loading());
        assert_eq!(app.navigator.lab.steps.index(), 1);
        assert_eq!(app.navigator.tab(), DetailTab::Simulation);
        assert_eq!(
            app.navigator.selection.experiment().unwrap().id.as_str(),
            "onion-peel"
        );
    }

    #[test]
    fn test_leaving_lab_discards_lookup() {
        let mut app = app_with(Arc::new(FoundResolver));
        open_onion_peel(&mut app);
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Esc);

        assert!(!app.lookup.is_pending());
        assert!(app.navigator.lab.media.is_idle());
    }

    #[test]
    fn test_drilling_down_keeps_pending_lookup() {
        let mut app = app();
        let _ = app.lookup.spawn(&ExperimentId::new("onion-peel"));
        assert!(app.lookup.is_pending());

        // class, then textbook: neither opens a lab
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator.view(), View::Textbooks);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator.view(), View::Experiments);
        assert!(app.lookup.is_pending());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator.view(), View::Lab);
        assert!(!app.lookup.is_pending());
    }

    #[test]
    fn test_help_line_matches_screen_on_simulation_tab() {
        let help_text = |app: &App| -> String {
            app.help_line()
                .spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect()
        };

        let mut app = app();
        open_onion_peel(&mut app);
        press(&mut app, KeyCode::Char('3'));
        let catalog_help = help_text(&app);
        assert!(catalog_help.contains("retry"));
        assert!(catalog_help.contains("open video"));

        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.featured.tab(), DetailTab::Simulation);
        let featured_help = help_text(&app);
        assert!(featured_help.contains("step"));
        assert!(!featured_help.contains("retry"));
        assert!(!featured_help.contains("open video"));
    }

    #[test]
    fn test_catalog_last_step_is_inert() {
        let mut app = app();
        open_onion_peel(&mut app);
        press(&mut app, KeyCode::Char('3'));
        for _ in 0..10 {
            press(&mut app, KeyCode::Char('n'));
        }
        assert_eq!(app.navigator.lab.steps.index(), 5);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_steps_ignored_outside_simulation_tab() {
        let mut app = app();
        open_onion_peel(&mut app);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.navigator.lab.steps.index(), 0);
    }

    #[test]
    fn test_featured_finish_sets_status() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.screen, Screen::Featured);

        press(&mut app, KeyCode::Char('3'));
        for _ in 0..5 {
            press(&mut app, KeyCode::Char('n'));
        }
        assert!(app.status_message.is_none());
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(
            app.status_message.as_deref(),
            Some("✓ Onion Peel Cell Observation complete")
        );
        assert!(!app.lookup.is_pending());
    }

    #[test]
    fn test_screens_keep_independent_state() {
        let mut app = app();
        open_onion_peel(&mut app);
        press(&mut app, KeyCode::Char('4'));

        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('J'));
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('f'));

        assert_eq!(app.screen, Screen::Catalog);
        assert_eq!(app.navigator.tab(), DetailTab::Guide);
        assert_eq!(
            app.navigator.selection.experiment().unwrap().id.as_str(),
            "onion-peel"
        );
        assert_eq!(app.featured.selected().unwrap().as_str(), "dna-extract");
        assert_eq!(app.featured.tab(), DetailTab::Procedure);
    }

    #[test]
    fn test_quit_dialog_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.modals.top(), Some(&Modal::QuitConfirm));
        press(&mut app, KeyCode::Char('n'));
        assert!(app.modals.is_empty());
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_placeholder_tabs_for_experiment_without_detail() {
        let mut app = app();
        // class-9 → science-9 → plant-cells
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.navigator.selection.experiment().unwrap().id.as_str(),
            "plant-cells"
        );
        assert!(screen_text(&mut app).contains("Theory content will appear here..."));
    }

    #[test]
    fn test_start_screen_from_config() {
        let catalog = Catalog::embedded().unwrap();
        let config = Config {
            start_screen: StartScreen::Featured,
            ..Config::default()
        };
        let app = App::with_resolver(catalog, config, Arc::new(OfflineResolver));
        assert_eq!(app.screen, Screen::Featured);
        assert_eq!(app.mode, AppMode::Splash);
    }
}
