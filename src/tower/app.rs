use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot::error::RecvError};
use tracing::{debug, warn};

use crate::config::{Config, RoutingPolicy};
use crate::models::{BackendState, DeliveryTag, InputSource};
use crate::popup::{
    EditorAction, KeyToken, ModePicker, PickerAction, Popup, PopupWaiter, QueueEditor, TextInput,
    TextInputEvent,
};
use crate::session::{BackendEvent, BackendHandle, Host, InputOutcome, NoticeLevel, SessionController};

use super::host::AppHost;
use super::ui::UI;
use super::widgets::{HelpModal, TranscriptKind};

/// Redraw interval while nothing else happens.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// A busy-time submission waiting on its mode picker.
struct PendingPick {
    text: String,
    waiter: PopupWaiter<PickerAction>,
}

/// A popup that has produced its answer.
enum Resolution {
    Picked(Result<PickerAction, RecvError>),
    Edited(Result<EditorAction, RecvError>),
}

pub struct TowerApp {
    controller: SessionController,
    host: AppHost,
    composer: TextInput,
    picker: Option<Popup<ModePicker>>,
    pending_pick: Option<PendingPick>,
    editor: Option<Popup<QueueEditor>>,
    editor_waiter: Option<PopupWaiter<EditorAction>>,
    help_modal: HelpModal,
    running: bool,
}

impl TowerApp {
    pub fn new(config: &Config, policy: RoutingPolicy, backend: BackendHandle) -> Self {
        Self {
            controller: SessionController::new(policy),
            host: AppHost::new(backend, config.display.status_max_items),
            composer: TextInput::new(),
            picker: None,
            pending_pick: None,
            editor: None,
            editor_waiter: None,
            help_modal: HelpModal::new(),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn host(&self) -> &AppHost {
        &self.host
    }

    pub fn composer(&self) -> &TextInput {
        &self.composer
    }

    pub fn picker(&self) -> Option<&ModePicker> {
        self.picker.as_ref().map(Popup::widget)
    }

    pub fn editor(&self) -> Option<&QueueEditor> {
        self.editor.as_ref().map(Popup::widget)
    }

    pub fn help_modal(&self) -> &HelpModal {
        &self.help_modal
    }

    pub fn backend_state(&self) -> BackendState {
        self.controller.backend()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        if self.help_modal.is_visible() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::F(1)) {
                self.help_modal.hide();
            }
            return;
        }

        let token = KeyToken::from(key);

        if let Some(picker) = self.picker.as_mut() {
            if picker.handle_key(token) {
                self.picker = None;
            }
            return;
        }

        if let Some(editor) = self.editor.as_mut() {
            if editor.handle_key(token) {
                self.editor = None;
            }
            return;
        }

        if key.code == KeyCode::F(1) {
            self.help_modal.toggle();
            return;
        }

        if key.modifiers.contains(KeyModifiers::ALT)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        {
            self.open_editor();
            return;
        }

        match self.composer.handle_key(token) {
            Some(TextInputEvent::Submit(_)) => {
                if self.composer.is_blank() {
                    return;
                }
                let text = self.composer.take();
                self.host.clear_notice();
                self.submit(text);
            }
            Some(TextInputEvent::Cancel) => self.host.clear_notice(),
            None => {}
        }
    }

    fn submit(&mut self, text: String) {
        match self
            .controller
            .handle_input(text, InputSource::Interactive, &mut self.host)
        {
            InputOutcome::Handled => {}
            InputOutcome::Continue(text) => self.default_submission(text),
            InputOutcome::PickMode(picker) => {
                let text = picker.message_text().to_string();
                let (popup, waiter) = Popup::open(picker);
                debug!("mode picker opened");
                self.picker = Some(popup);
                self.pending_pick = Some(PendingPick { text, waiter });
            }
        }
    }

    /// What a submission does when the queue does not take it: built-in
    /// commands, or a plain delivery.
    fn default_submission(&mut self, text: String) {
        let command = text.split_whitespace().next().unwrap_or("");
        match command {
            "/queue" => self.open_editor(),
            "/help" => self.help_modal.show(),
            "/quit" => self.quit(),
            "/session" => {
                if self.picker.is_some() || self.editor.is_some() {
                    self.host
                        .notify("Close the open popup first", NoticeLevel::Warning);
                    return;
                }
                self.controller.on_session_start(&mut self.host);
                self.host
                    .transcript_mut()
                    .push(TranscriptKind::System, "new session");
                self.host.notify("Started a new session", NoticeLevel::Info);
            }
            c if c.starts_with('/') => {
                self.host
                    .notify(&format!("Unknown command: {}", c), NoticeLevel::Warning);
            }
            _ => {
                // Picker skipped: a busy backend runs this after its current task.
                let backend = self.controller.backend();
                let tag = if backend.is_busy() {
                    DeliveryTag::FollowUp
                } else {
                    DeliveryTag::Default
                };
                self.host.dispatch(&text, tag, backend);
            }
        }
    }

    fn open_editor(&mut self) {
        if let Some(editor) = self.controller.open_editor(&mut self.host) {
            let (popup, waiter) = Popup::open(editor);
            debug!("queue editor opened");
            self.editor = Some(popup);
            self.editor_waiter = Some(waiter);
        }
    }

    pub fn on_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::AgentStart => self.controller.on_agent_start(),
            BackendEvent::Output(line) => {
                self.host.transcript_mut().push(TranscriptKind::Backend, line);
            }
            BackendEvent::AgentEnd => self.controller.on_agent_end(&mut self.host),
        }
    }

    /// Waits until an open popup resolves. Pends forever when none is open.
    async fn next_resolution(&mut self) -> Resolution {
        let pick = self.pending_pick.as_mut().map(|p| &mut p.waiter);
        let edit = self.editor_waiter.as_mut();
        tokio::select! {
            action = wait_on(pick) => Resolution::Picked(action),
            action = wait_on(edit) => Resolution::Edited(action),
        }
    }

    fn apply_resolution(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Picked(result) => {
                let Some(pending) = self.pending_pick.take() else {
                    return;
                };
                self.picker = None;
                let action = result.unwrap_or_else(|_| {
                    warn!("mode picker dropped without an answer");
                    PickerAction::Cancel
                });
                self.controller
                    .finish_mode_pick(pending.text, action, &mut self.host);
                if let Some(text) = self.host.take_restored() {
                    self.composer.set_content(text);
                }
            }
            Resolution::Edited(result) => {
                self.editor_waiter = None;
                self.editor = None;
                let action = result.unwrap_or_else(|_| {
                    warn!("queue editor dropped without an answer");
                    EditorAction::Cancel
                });
                self.controller.finish_edit(action, &mut self.host);
            }
        }
    }

    pub async fn run(&mut self, mut backend_events: mpsc::UnboundedReceiver<BackendEvent>) -> Result<()> {
        let mut terminal = match UI::setup_terminal() {
            Ok(terminal) => terminal,
            Err(e) => {
                self.host.shutdown();
                return Err(e).context("Failed to set up terminal");
            }
        };

        let result = self.event_loop(&mut terminal, &mut backend_events).await;
        self.host.shutdown();

        UI::restore_terminal().context("Failed to restore terminal")?;
        result
    }

    async fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        backend_events: &mut mpsc::UnboundedReceiver<BackendEvent>,
    ) -> Result<()> {
        let mut term_events = EventStream::new();
        let mut tick = tokio::time::interval(TICK_INTERVAL);

        self.controller.on_session_start(&mut self.host);

        while self.is_running() {
            terminal.draw(|frame| UI::render(frame, &*self))?;

            tokio::select! {
                maybe_event = term_events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                    None => self.quit(),
                },
                event = backend_events.recv() => match event {
                    Some(event) => self.on_backend_event(event),
                    None => {
                        warn!("backend event channel closed");
                        self.quit();
                    }
                },
                resolution = self.next_resolution() => self.apply_resolution(resolution),
                _ = tick.tick() => {}
            }
        }

        Ok(())
    }
}

async fn wait_on<T>(waiter: Option<&mut PopupWaiter<T>>) -> Result<T, RecvError> {
    match waiter {
        Some(rx) => rx.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeliveryMode;
    use crate::popup::EditorMode;
    use crate::session::BackendCommand;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn create_test_app() -> (TowerApp, UnboundedReceiver<BackendCommand>) {
        let (handle, rx) = BackendHandle::channel();
        let app = TowerApp::new(&Config::default(), RoutingPolicy::default(), handle);
        (app, rx)
    }

    fn press(app: &mut TowerApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn alt(app: &mut TowerApp, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT));
    }

    fn type_text(app: &mut TowerApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn send(app: &mut TowerApp, text: &str) {
        type_text(app, text);
        press(app, KeyCode::Enter);
    }

    async fn settle(app: &mut TowerApp) {
        let resolution = app.next_resolution().await;
        app.apply_resolution(resolution);
    }

    fn sent(rx: &mut UnboundedReceiver<BackendCommand>) -> Vec<BackendCommand> {
        let mut out = Vec::new();
        while let Ok(command) = rx.try_recv() {
            out.push(command);
        }
        out
    }

    /// Busy backend, one follow-up per text queued through the picker.
    async fn queue_follow_ups(app: &mut TowerApp, texts: &[&str]) {
        app.on_backend_event(BackendEvent::AgentStart);
        for text in texts {
            send(app, text);
            press(app, KeyCode::Right);
            press(app, KeyCode::Enter);
            settle(app).await;
        }
    }

    #[test]
    fn tower_app_starts_running() {
        let (app, _rx) = create_test_app();
        assert!(app.is_running());
        assert_eq!(app.backend_state(), BackendState::Idle);
    }

    #[test]
    fn ctrl_c_quits() {
        let (mut app, _rx) = create_test_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.is_running());
    }

    #[test]
    fn idle_submission_goes_straight_to_backend() {
        let (mut app, mut rx) = create_test_app();

        send(&mut app, "hello");

        assert_eq!(sent(&mut rx), vec![BackendCommand::Prompt("hello".into())]);
        assert!(app.composer().content().is_empty());
        assert!(app.picker().is_none());
    }

    #[test]
    fn blank_submission_is_ignored() {
        let (mut app, mut rx) = create_test_app();
        send(&mut app, "   ");
        assert!(sent(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn busy_submission_steers_by_default() {
        let (mut app, mut rx) = create_test_app();
        app.on_backend_event(BackendEvent::AgentStart);

        send(&mut app, "use the other file");
        assert_eq!(app.picker().unwrap().selected(), DeliveryMode::Steer);
        assert!(sent(&mut rx).is_empty());

        press(&mut app, KeyCode::Enter);
        assert!(app.picker().is_none());
        settle(&mut app).await;

        assert_eq!(
            sent(&mut rx),
            vec![BackendCommand::Steer("use the other file".into())]
        );
        assert!(app.controller().queue().is_empty());
    }

    #[tokio::test]
    async fn follow_up_waits_for_agent_end() {
        let (mut app, mut rx) = create_test_app();
        queue_follow_ups(&mut app, &["then run tests"]).await;

        assert!(sent(&mut rx).is_empty());
        assert_eq!(app.host().status().len(), 1);
        assert_eq!(app.host().notice().unwrap().0, "Queued follow-up: then run tests");

        app.on_backend_event(BackendEvent::AgentEnd);

        assert_eq!(sent(&mut rx), vec![BackendCommand::Prompt("then run tests".into())]);
        assert!(app.host().status().is_empty());
    }

    #[tokio::test]
    async fn picker_remembers_last_choice() {
        let (mut app, _rx) = create_test_app();
        queue_follow_ups(&mut app, &["one"]).await;

        send(&mut app, "two");
        assert_eq!(app.picker().unwrap().selected(), DeliveryMode::FollowUp);
    }

    #[tokio::test]
    async fn cancelled_pick_restores_composer() {
        let (mut app, mut rx) = create_test_app();
        app.on_backend_event(BackendEvent::AgentStart);

        send(&mut app, "not yet");
        press(&mut app, KeyCode::Esc);
        settle(&mut app).await;

        assert_eq!(app.composer().content(), "not yet");
        assert!(sent(&mut rx).is_empty());
        assert!(app.controller().queue().is_empty());
    }

    #[tokio::test]
    async fn follow_up_after_backend_went_idle_is_sent_immediately() {
        let (mut app, mut rx) = create_test_app();
        app.on_backend_event(BackendEvent::AgentStart);

        send(&mut app, "late");
        app.on_backend_event(BackendEvent::AgentEnd);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;

        assert_eq!(sent(&mut rx), vec![BackendCommand::Prompt("late".into())]);
        assert!(app.controller().queue().is_empty());
    }

    #[tokio::test]
    async fn slash_commands_skip_the_picker() {
        let (mut app, mut rx) = create_test_app();
        app.on_backend_event(BackendEvent::AgentStart);

        send(&mut app, "/bogus arg");

        assert!(app.picker().is_none());
        assert!(sent(&mut rx).is_empty());
        assert_eq!(app.host().notice().unwrap().0, "Unknown command: /bogus");
    }

    #[test]
    fn quit_and_help_commands() {
        let (mut app, _rx) = create_test_app();

        send(&mut app, "/help");
        assert!(app.help_modal().is_visible());
        press(&mut app, KeyCode::Esc);
        assert!(!app.help_modal().is_visible());

        send(&mut app, "/quit");
        assert!(!app.is_running());
    }

    #[test]
    fn editor_on_empty_queue_only_notifies() {
        let (mut app, _rx) = create_test_app();

        alt(&mut app, 'q');
        assert!(app.editor().is_none());
        assert_eq!(app.host().notice().unwrap().0, "No queued messages");

        send(&mut app, "/queue");
        assert!(app.editor().is_none());
    }

    #[tokio::test]
    async fn editor_commit_while_busy_pulls_steer_forward() {
        let (mut app, mut rx) = create_test_app();
        queue_follow_ups(&mut app, &["first", "second"]).await;

        alt(&mut app, 'q');
        assert!(app.controller().is_editing());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;

        assert!(!app.controller().is_editing());
        assert_eq!(sent(&mut rx), vec![BackendCommand::Steer("second".into())]);
        assert_eq!(app.host().status().len(), 1);
    }

    #[tokio::test]
    async fn agent_end_waits_while_editor_is_open() {
        let (mut app, mut rx) = create_test_app();
        queue_follow_ups(&mut app, &["first", "second"]).await;

        alt(&mut app, 'q');
        app.on_backend_event(BackendEvent::AgentEnd);
        assert!(sent(&mut rx).is_empty());

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;

        assert_eq!(sent(&mut rx), vec![BackendCommand::Prompt("second".into())]);
        assert_eq!(app.controller().queue().items()[0].text, "first");
    }

    #[tokio::test]
    async fn editor_cancel_discards_text_edits() {
        let (mut app, _rx) = create_test_app();
        queue_follow_ups(&mut app, &["typo"]).await;

        alt(&mut app, 'q');
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.editor().unwrap().mode(), EditorMode::Edit);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "ps");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.editor().unwrap().items()[0].text, "typs");
        press(&mut app, KeyCode::Esc);
        settle(&mut app).await;

        assert_eq!(app.controller().queue().items()[0].text, "typo");
        assert!(!app.controller().is_editing());
    }

    #[tokio::test]
    async fn session_command_drops_the_queue() {
        let (mut app, _rx) = create_test_app();
        queue_follow_ups(&mut app, &["stale"]).await;

        send(&mut app, "/session");

        assert!(app.controller().queue().is_empty());
        assert!(app.host().status().is_empty());
        assert_eq!(app.backend_state(), BackendState::Busy);
    }

    #[tokio::test]
    async fn session_switch_mid_task_still_opens_picker() {
        let (mut app, mut rx) = create_test_app();
        app.on_backend_event(BackendEvent::AgentStart);

        send(&mut app, "/session");
        send(&mut app, "hello");

        assert!(app.picker().is_some());
        assert_eq!(app.backend_state(), BackendState::Busy);
        assert!(sent(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn escape_on_emptied_editor_keeps_queue() {
        let (mut app, mut rx) = create_test_app();
        queue_follow_ups(&mut app, &["first", "second"]).await;

        alt(&mut app, 'q');
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Esc);
        settle(&mut app).await;

        let texts: Vec<&str> = app
            .controller()
            .queue()
            .items()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(app.host().status().len(), 2);
        assert!(sent(&mut rx).is_empty());
    }

    #[test]
    fn restricted_terminal_sends_busy_input_as_follow_up() {
        let (handle, mut rx) = BackendHandle::channel();
        let policy = RoutingPolicy {
            disabled: false,
            limited_terminal: true,
        };
        let mut app = TowerApp::new(&Config::default(), policy, handle);

        send(&mut app, "first");
        app.on_backend_event(BackendEvent::AgentStart);
        send(&mut app, "second");

        assert!(app.picker().is_none());
        assert_eq!(
            sent(&mut rx),
            vec![
                BackendCommand::Prompt("first".into()),
                BackendCommand::FollowUp("second".into()),
            ]
        );
    }

    #[test]
    fn backend_output_lands_in_transcript() {
        let (mut app, _rx) = create_test_app();
        app.on_backend_event(BackendEvent::Output("working on: x".into()));
        assert_eq!(app.host().transcript().lines()[0].text, "working on: x");
    }
}
