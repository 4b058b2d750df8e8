//! Root application component
//!
//! The App owns the prediction state and the background runner, and routes
//! Actions between them and the child components. Components never touch
//! the prediction state directly.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, draw_header, draw_help_bar, FormComponent, FormField, HelpDialog,
    QuitDialog, ResultsComponent,
};
use crate::config::Config;
use crate::error::{SubmitRejected, TransportError};
use crate::model::modal::{Modal, ModalStack};
use crate::model::{FormState, PredictionState, ServiceHealth};
use crate::services::{PredictClient, PredictionRunner, RunnerMessage};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use tracing::warn;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    /// Form, request status and results
    pub state: PredictionState,

    /// Background service calls
    pub runner: PredictionRunner,

    /// Last known reachability of the service
    pub service: ServiceHealth,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub form: FormComponent,
    pub results: ResultsComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(config: &Config) -> Result<App> {
        let client = PredictClient::new(&config.endpoint, config.request_timeout())?;
        let runner = PredictionRunner::new(client)?;
        Ok(Self::with_runner(config.defaults.to_form(), runner))
    }

    fn with_runner(form: FormState, runner: PredictionRunner) -> App {
        App {
            state: PredictionState::new(form),
            runner,
            service: ServiceHealth::Unknown,
            modals: ModalStack::new(),
            should_quit: false,
            form: FormComponent::new(),
            results: ResultsComponent::new(),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
        }
    }

    fn submit(&mut self) {
        match self.state.begin_submit() {
            Ok(submission) => {
                self.results.reset_scroll();
                self.runner.spawn(submission);
            }
            Err(SubmitRejected::AlreadyPending) => {}
            Err(SubmitRejected::Invalid(_)) => {
                self.results.reset_scroll();
            }
        }
    }

    fn cancel_request(&mut self) {
        self.runner.abort();
        self.state.abandon();
    }

    fn check_service(&mut self) {
        self.service = ServiceHealth::Checking;
        self.runner.check_health();
    }

    /// Apply finished background calls
    fn poll_runner(&mut self) {
        // Sampled before draining: a call that finished has already sent its result
        let busy = self.runner.is_busy();

        for message in self.runner.poll() {
            match message {
                RunnerMessage::Prediction { generation, result } => {
                    self.state.settle(generation, result);
                }
                RunnerMessage::Health(Ok(message)) => {
                    self.service = ServiceHealth::Up(message);
                }
                RunnerMessage::Health(Err(err)) => {
                    warn!(error = %err, "prediction service health check failed");
                    self.service = ServiceHealth::Down;
                }
            }
        }

        if self.state.loading() && !busy {
            let generation = self.state.generation();
            self.state.settle(generation, Err(TransportError::Lost));
        }
    }

    fn edit_text(&mut self, edit: impl FnOnce(&mut String)) {
        match self.form.focus {
            FormField::Keyword => {
                let mut keyword = self.state.keyword().to_string();
                edit(&mut keyword);
                self.state.set_keyword(keyword);
            }
            FormField::DaysToPredict => {
                let mut days = self.state.days_to_predict().to_string();
                edit(&mut days);
                self.state.set_days_to_predict(days);
            }
            _ => {}
        }
    }

    fn cycle_option(&mut self, forward: bool) {
        match self.form.focus {
            FormField::TimeFrame => {
                let current = self.state.time_frame();
                let next = if forward { current.next() } else { current.prev() };
                self.state.set_time_frame(next);
            }
            FormField::Method => {
                let next = self.state.method().toggle();
                self.state.set_method(next);
            }
            _ => {}
        }
    }

    fn handle_modal_key_event(&mut self, modal: Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area),
            Modal::Help => self.help_dialog.draw(frame, area),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.check_service();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top() {
            return self.handle_modal_key_event(modal, key);
        }

        let action = match key.code {
            KeyCode::F(1) => Some(Action::OpenHelp),
            KeyCode::Esc if self.state.loading() => Some(Action::CancelRequest),
            KeyCode::Esc => Some(Action::OpenQuitDialog),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Char('e') if ctrl => Some(Action::ScrollDown),
            KeyCode::Char('y') if ctrl => Some(Action::ScrollUp),
            KeyCode::Char('b') if ctrl => Some(Action::ToggleBands),
            KeyCode::Char('r') if ctrl => Some(Action::CheckService),
            _ => return self.form.handle_key_event(key),
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.poll_runner(),
            Action::ForceQuit => {
                self.cancel_request();
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Form Editing
            // ─────────────────────────────────────────────────────────────────
            Action::NextField | Action::PrevField => {
                self.form.update(action)?;
            }
            Action::FieldInput(c) => self.edit_text(|text| text.push(c)),
            Action::FieldBackspace => self.edit_text(|text| {
                text.pop();
            }),
            Action::ClearField => self.edit_text(String::clear),
            Action::NextOption => self.cycle_option(true),
            Action::PrevOption => self.cycle_option(false),

            // ─────────────────────────────────────────────────────────────────
            // Requests
            // ─────────────────────────────────────────────────────────────────
            Action::Submit => self.submit(),
            Action::CancelRequest => self.cancel_request(),
            Action::CheckService => self.check_service(),

            // ─────────────────────────────────────────────────────────────────
            // Results (delegate to ResultsComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp
            | Action::ScrollDown
            | Action::PageUp
            | Action::PageDown
            | Action::ToggleBands => {
                self.results.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.request_in_flight = self.state.loading();
                self.modals.push(Modal::QuitConfirm);
            }
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
        let layout = calculate_main_layout(area);

        draw_header(
            frame,
            layout.header,
            self.runner.endpoint(),
            &self.service,
            &self.state,
        );
        self.form.draw_with_state(frame, layout.form, &self.state);
        self.results.draw_with_state(frame, layout.results, &self.state);
        draw_help_bar(frame, layout.help, self.form.focus, self.state.loading());

        if let Some(modal) = self.modals.top() {
            self.draw_modal(frame, area, modal)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NETWORK_ERROR, REQUEST_CANCELLED};
    use crate::model::{Method, RequestStatus, TimeFrame};
    use std::net::TcpListener;
    use std::thread;
    use std::time::{Duration, Instant};

    fn app_for(url: String) -> App {
        let client = PredictClient::new(url, None).unwrap();
        let runner = PredictionRunner::new(client).unwrap();
        App::with_runner(FormState::default(), runner)
    }

    fn press(app: &mut App, code: KeyCode) {
        dispatch(app, KeyEvent::from(code));
    }

    fn dispatch(app: &mut App, key: KeyEvent) {
        let mut next = app.handle_key_event(key).unwrap();
        while let Some(action) = next {
            next = app.update(action).unwrap();
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn tick_until_settled(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.state.loading() && Instant::now() < deadline {
            app.update(Action::Tick).unwrap();
            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Fill the form the way a user would: keyword, month, linear, 14 days
    fn fill_bitcoin_form(app: &mut App) {
        type_text(app, "bitcoin");
        press(app, KeyCode::Tab);
        press(app, KeyCode::Right);
        press(app, KeyCode::Tab);
        press(app, KeyCode::Right);
        press(app, KeyCode::Tab);
        press(app, KeyCode::Backspace);
        type_text(app, "14");
    }

    #[test]
    fn test_form_editing_through_keys() {
        let mut app = app_for("http://127.0.0.1:9".to_string());
        fill_bitcoin_form(&mut app);
        assert_eq!(app.state.keyword(), "bitcoin");
        assert_eq!(app.state.time_frame(), TimeFrame::Month);
        assert_eq!(app.state.method(), Method::Linear);
        assert_eq!(app.state.days_to_predict(), "14");
        assert_eq!(app.state.status(), &RequestStatus::Idle);
    }

    #[test]
    fn test_submit_and_render_rows() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/predict")
            .match_body(
                r#"{"keyword":"bitcoin","time_frame":"month","method":"linear","days_to_predict":14}"#,
            )
            .with_status(200)
            .with_body(
                r#"{"historical":[{"ds":"2024-01-01","yhat":1.5,"yhat_lower":1.0,"yhat_upper":2.0}],
                    "forecast":[{"ds":"2024-01-02","yhat":12.345,"yhat_lower":11.0,"yhat_upper":13.0}]}"#,
            )
            .create();

        let mut app = app_for(server.url());
        fill_bitcoin_form(&mut app);
        press(&mut app, KeyCode::Enter);
        assert!(app.state.loading());

        tick_until_settled(&mut app);
        mock.assert();
        assert_eq!(app.state.status(), &RequestStatus::Succeeded);
        let historical: Vec<String> = app.state.historical_rows().collect();
        let forecast: Vec<String> = app.state.forecast_rows().collect();
        assert_eq!(historical, vec!["2024-01-01: 1.50%"]);
        assert_eq!(forecast, vec!["2024-01-02: 12.35%"]);
    }

    #[test]
    fn test_domain_error_is_shown_verbatim() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/predict")
            .with_status(400)
            .with_body(r#"{"error": "invalid keyword"}"#)
            .create();

        let mut app = app_for(server.url());
        type_text(&mut app, "bitcoin");
        press(&mut app, KeyCode::Enter);
        tick_until_settled(&mut app);
        assert_eq!(app.state.error(), "invalid keyword");
        assert_eq!(app.state.historical_rows().count(), 0);
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut app = app_for(format!("http://{}", addr));
        type_text(&mut app, "bitcoin");
        press(&mut app, KeyCode::Enter);
        tick_until_settled(&mut app);
        assert_eq!(app.state.error(), NETWORK_ERROR);
        assert!(!app.state.loading());
    }

    #[test]
    fn test_invalid_form_sends_nothing() {
        let mut server = mockito::Server::new();
        let mock = server.mock("POST", "/predict").expect(0).create();

        let mut app = app_for(server.url());
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(!app.state.loading());
        assert_eq!(app.state.error(), "Keyword is required");

        app.update(Action::Tick).unwrap();
        mock.assert();
    }

    #[test]
    fn test_enter_while_pending_is_ignored_and_esc_cancels() {
        // Accepts the connection, never answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut app = app_for(format!("http://{}", addr));
        type_text(&mut app, "bitcoin");
        press(&mut app, KeyCode::Enter);
        let generation = app.state.generation();

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.generation(), generation);
        assert!(app.state.loading());

        press(&mut app, KeyCode::Esc);
        assert!(!app.state.loading());
        assert_eq!(app.state.error(), REQUEST_CANCELLED);
        assert!(app.modals.top().is_none());
        drop(listener);
    }

    #[test]
    fn test_task_ending_without_result_clears_loading() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut app = app_for(format!("http://{}", addr));
        type_text(&mut app, "bitcoin");
        press(&mut app, KeyCode::Enter);
        assert!(app.state.loading());

        // The task goes away without reporting and the state is left pending
        assert!(app.runner.abort());
        assert!(app.state.loading());

        app.update(Action::Tick).unwrap();
        assert!(!app.state.loading());
        assert_eq!(app.state.error(), NETWORK_ERROR);
        drop(listener);
    }

    #[test]
    fn test_edits_allowed_while_pending() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut app = app_for(format!("http://{}", addr));
        type_text(&mut app, "bitcoin");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "s");
        assert_eq!(app.state.keyword(), "bitcoins");
        assert!(app.state.loading());
        drop(listener);
    }

    #[test]
    fn test_quit_flow() {
        let mut app = app_for("http://127.0.0.1:9".to_string());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.modals.top(), Some(Modal::QuitConfirm));

        // Keys go to the dialog, not the form
        press(&mut app, KeyCode::Char('n'));
        assert!(app.modals.top().is_none());
        assert_eq!(app.state.keyword(), "");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_anywhere() {
        let mut app = app_for("http://127.0.0.1:9".to_string());
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.modals.top(), Some(Modal::Help));
        dispatch(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_health_check_updates_service() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"{"message": "API is working"}"#)
            .create();

        let mut app = app_for(server.url());
        app.init().unwrap();
        assert_eq!(app.service, ServiceHealth::Checking);

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.service == ServiceHealth::Checking && Instant::now() < deadline {
            app.update(Action::Tick).unwrap();
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(app.service, ServiceHealth::Up("API is working".to_string()));
    }
}
