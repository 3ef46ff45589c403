use std::collections::VecDeque;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend channel closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Start a task, or hold it behind the running one.
    Prompt(String),
    /// Replace the running task's instructions.
    Steer(String),
    /// Run after the current task, within the same busy period.
    FollowUp(String),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    AgentStart,
    Output(String),
    AgentEnd,
}

#[derive(Debug, Clone)]
pub struct BackendHandle {
    tx: mpsc::UnboundedSender<BackendCommand>,
}

impl BackendHandle {
    pub fn send(&self, command: BackendCommand) -> Result<(), BackendError> {
        self.tx.send(command).map_err(|_| BackendError::Closed)
    }

    /// A handle wired to a bare receiver, for inspecting what gets sent.
    #[cfg(test)]
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<BackendCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

struct RunningTask {
    text: String,
    deadline: Instant,
}

/// Stand-in for an agent runtime: each task keeps it busy for a fixed time.
pub struct SimulatedBackend {
    task_duration: Duration,
    events: mpsc::UnboundedSender<BackendEvent>,
    current: Option<RunningTask>,
    held: VecDeque<String>,
}

impl SimulatedBackend {
    pub fn spawn(
        task_duration: Duration,
    ) -> (BackendHandle, mpsc::UnboundedReceiver<BackendEvent>, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let backend = Self {
            task_duration,
            events: event_tx,
            current: None,
            held: VecDeque::new(),
        };
        let handle = tokio::spawn(backend.run(cmd_rx));

        (BackendHandle { tx: cmd_tx }, event_rx, handle)
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<BackendCommand>) {
        loop {
            let deadline = self.current.as_ref().map(|t| t.deadline);
            let finished = async move {
                match deadline {
                    Some(d) => sleep_until(d).await,
                    None => std::future::pending().await,
                }
            };

            let alive = tokio::select! {
                command = commands.recv() => match command {
                    Some(BackendCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                _ = finished => self.finish_current(),
            };
            if !alive {
                break;
            }
        }
        debug!("simulated backend stopped");
    }

    fn handle_command(&mut self, command: BackendCommand) -> bool {
        match command {
            BackendCommand::Prompt(text) | BackendCommand::FollowUp(text) => {
                if self.current.is_some() {
                    self.held.push_back(text);
                    self.emit(BackendEvent::Output(format!(
                        "holding message ({} waiting)",
                        self.held.len()
                    )))
                } else {
                    self.start(text)
                }
            }
            BackendCommand::Steer(text) => match self.current.as_mut() {
                Some(task) => {
                    info!("steering running task");
                    task.text = text.clone();
                    task.deadline = Instant::now() + self.task_duration;
                    self.emit(BackendEvent::Output(format!("steered: {text}")))
                }
                None => self.start(text),
            },
            BackendCommand::Shutdown => false,
        }
    }

    fn start(&mut self, text: String) -> bool {
        let was_idle = self.current.is_none();
        self.current = Some(RunningTask {
            text: text.clone(),
            deadline: Instant::now() + self.task_duration,
        });
        if was_idle && !self.emit(BackendEvent::AgentStart) {
            return false;
        }
        self.emit(BackendEvent::Output(format!("working on: {text}")))
    }

    fn finish_current(&mut self) -> bool {
        let Some(task) = self.current.take() else {
            return true;
        };
        if !self.emit(BackendEvent::Output(format!("finished: {}", task.text))) {
            return false;
        }
        match self.held.pop_front() {
            Some(next) => {
                self.current = Some(RunningTask {
                    text: next.clone(),
                    deadline: Instant::now() + self.task_duration,
                });
                self.emit(BackendEvent::Output(format!("working on: {next}")))
            }
            None => self.emit(BackendEvent::AgentEnd),
        }
    }

    /// Returns false once nobody is listening.
    fn emit(&self, event: BackendEvent) -> bool {
        self.events.send(event).is_ok()
    }
}
