//! Main TUI application.
//!
//! Handles:
//! - Input event handling
//! - Keeping the orchestrator's form data in step with the widgets
//! - Applying background prediction results on the UI thread

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};

use crate::application::PredictionOrchestrator;
use crate::config::AppConfig;
use crate::ports::RiskPredictor;

use super::styles::MedicalTheme;
use super::ui::{
    form::{render_health_form, HealthFormState},
    render_disclaimer,
    result::render_result,
};

/// How long to wait for in-flight calls when quitting.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

/// Main application state
pub struct App {
    orchestrator: PredictionOrchestrator<dyn RiskPredictor>,
    form_state: HealthFormState,
    should_quit: bool,
}

impl App {
    /// Create the application from runtime configuration.
    ///
    /// # Errors
    /// Returns error if the predictor cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let predictor = config.build_predictor()?;
        Ok(Self::with_predictor(predictor, config.debounce))
    }

    /// Create application with an injected predictor (Composition Root pattern).
    pub fn with_predictor(predictor: Arc<dyn RiskPredictor>, debounce: Duration) -> Self {
        Self {
            orchestrator: PredictionOrchestrator::new(predictor, debounce),
            form_state: HealthFormState::default(),
            should_quit: false,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        if !self.orchestrator.wait_idle(SHUTDOWN_GRACE) {
            tracing::debug!(
                "Leaving {} prediction call(s) unfinished",
                self.orchestrator.in_flight()
            );
        }

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            // Apply finished calls and fire the refresh timer
            self.orchestrator.poll();

            self.draw(terminal)?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Header
                    Constraint::Min(0),    // Body
                    Constraint::Length(3), // Disclaimer
                ])
                .split(f.area());

            let header = Paragraph::new(Line::from(vec![
                Span::styled(" Heartcheck ", MedicalTheme::header()),
                Span::styled(
                    " Cardiovascular Risk Assessment",
                    MedicalTheme::text_secondary(),
                ),
                Span::styled(
                    format!(" │ predictor: {}", self.orchestrator.predictor_name()),
                    MedicalTheme::text_muted(),
                ),
            ]));
            f.render_widget(header, chunks[0]);

            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
                .split(chunks[1]);

            render_health_form(
                f,
                body[0],
                &self.form_state,
                self.orchestrator.is_loading(),
                self.orchestrator.error(),
            );
            render_result(
                f,
                body[1],
                self.orchestrator.result(),
                self.orchestrator.auto_update_enabled(),
            );

            render_disclaimer(f, chunks[2]);
        })?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let changed = match key {
            KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form_state.prev_field();
                false
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
                false
            }
            KeyCode::Left => self.form_state.cycle(false),
            KeyCode::Right => self.form_state.cycle(true),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.form_state.load_sample_data();
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.start_new_assessment();
                false
            }
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => {
                self.submit_form();
                false
            }
            _ => false,
        };

        if changed {
            self.orchestrator
                .on_field_change(self.form_state.to_form_data());
        }
    }

    fn submit_form(&mut self) {
        if self.orchestrator.is_loading() {
            tracing::debug!("Ignoring submit while a prediction is running");
            return;
        }

        // Edits already reached the orchestrator in `handle_key`.
        if !self.form_state.submit() {
            return;
        }

        self.orchestrator.submit(false);
    }

    fn start_new_assessment(&mut self) {
        self.orchestrator.reset();
        self.form_state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SimulatedPredictor;
    use crate::domain::{HealthFormData, PredictionPayload, PredictionResult};
    use crate::ports::PredictionError;
    use ratatui::backend::TestBackend;

    const WAIT: Duration = Duration::from_secs(5);

    fn app() -> App {
        let predictor: Arc<dyn RiskPredictor> =
            Arc::new(SimulatedPredictor::with_seed(Duration::ZERO, 42));
        App::with_predictor(predictor, Duration::from_millis(1000))
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_quit_keys() {
        let mut a = app();
        press(&mut a, KeyCode::Esc);
        assert!(a.should_quit);

        let mut b = app();
        b.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(b.should_quit);

        let mut c = app();
        press(&mut c, KeyCode::Char('q'));
        assert!(!c.should_quit);
    }

    #[test]
    fn test_edits_reach_orchestrator() {
        let mut app = app();
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.orchestrator.form().age, 61);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        assert!(app.orchestrator.form().sex.is_some());
    }

    #[test]
    fn test_incomplete_form_is_not_submitted() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);

        assert!(!app.orchestrator.is_loading());
        assert_eq!(app.orchestrator.in_flight(), 0);
        assert!(!app.form_state.invalid.is_empty());
    }

    #[test]
    fn test_sample_then_submit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.orchestrator.form(), &HealthFormData::sample());

        press(&mut app, KeyCode::Enter);
        assert!(app.orchestrator.is_loading());
        assert!(app.orchestrator.wait_idle(WAIT));

        assert!(app.orchestrator.result().is_some());
        assert!(app.orchestrator.auto_update_enabled());
        assert!(!app.orchestrator.is_loading());
    }

    #[test]
    fn test_resubmit_does_not_rearm_refresh() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert!(app.orchestrator.wait_idle(WAIT));
        let deadline = app.orchestrator.refresh_deadline();
        assert!(deadline.is_some());

        press(&mut app, KeyCode::Enter);

        assert!(app.orchestrator.is_loading());
        assert_eq!(app.orchestrator.refresh_deadline(), deadline);
        assert!(app.orchestrator.wait_idle(WAIT));
    }

    struct PanickingPredictor;

    impl RiskPredictor for PanickingPredictor {
        fn predict(&self, _: &PredictionPayload) -> Result<PredictionResult, PredictionError> {
            panic!("model crashed");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_predictor_panic_keeps_form_usable() {
        let predictor: Arc<dyn RiskPredictor> = Arc::new(PanickingPredictor);
        let mut app = App::with_predictor(predictor, Duration::from_millis(1000));
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert!(app.orchestrator.wait_idle(WAIT));

        assert!(!app.orchestrator.is_loading());
        assert!(app.orchestrator.error().is_some());

        // A second submit is accepted.
        press(&mut app, KeyCode::Enter);
        assert!(app.orchestrator.is_loading());
        assert!(app.orchestrator.wait_idle(WAIT));
        assert!(!app.orchestrator.is_loading());
    }

    #[test]
    fn test_new_assessment_resets_everything() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert!(app.orchestrator.wait_idle(WAIT));

        press(&mut app, KeyCode::Char('n'));

        assert!(app.orchestrator.result().is_none());
        assert!(!app.orchestrator.auto_update_enabled());
        assert_eq!(app.orchestrator.form(), &HealthFormData::default());
        assert_eq!(app.form_state.to_form_data(), HealthFormData::default());
    }

    #[test]
    fn test_draw_full_screen() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert!(app.orchestrator.wait_idle(WAIT));

        let mut terminal = Terminal::new(TestBackend::new(140, 45)).expect("Terminal");
        app.draw(&mut terminal).expect("Draw");

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Heartcheck"));
        assert!(text.contains("predictor: simulated"));
        assert!(text.contains("RISK"));
        assert!(text.contains("DISCLAIMER"));
    }
}
