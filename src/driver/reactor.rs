use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::wire::{self, HermesEvent, SessionNotice};
use crate::config::{SkillConfig, CONFIG_INI};
use crate::kernel::event::IntentMessage;
use crate::kernel::outcome::TurnOutcome;
use crate::kernel::{division, multiplication, DIVISION_INTENT, MULTIPLICATION_INTENT};
use crate::session::{self, RecordingSession, SessionManager};

/// Routes recognized intents to their handler and publishes the outcome.
///
/// Holds no conversation state: configuration is re-read on every turn and
/// everything else arrives with the intent message.
pub struct SkillReactor {
    config_path: PathBuf,
}

impl Default for SkillReactor {
    fn default() -> Self {
        Self::new(CONFIG_INI)
    }
}

impl SkillReactor {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// One turn. Returns `None` for intents this skill does not own
    /// (nothing is published for them).
    pub fn on_intent<M: SessionManager + ?Sized>(
        &self,
        message: &IntentMessage,
        manager: &mut M,
    ) -> Option<TurnOutcome> {
        let outcome = match message.intent.intent_name.as_str() {
            DIVISION_INTENT => {
                let config = SkillConfig::load(&self.config_path);
                division::handle(message, &config)
            }
            MULTIPLICATION_INTENT => multiplication::handle(message),
            other => {
                debug!("Ignoring intent {}", other);
                return None;
            }
        };

        debug!(
            session_id = %message.session_id,
            site_id = %message.site_id,
            input = %message.input,
            "Recognized input"
        );
        info!(
            session_id = %message.session_id,
            intent = %message.intent.intent_name,
            outcome = outcome.kind(),
            "Turn handled"
        );
        session::apply(&outcome, &message.session_id, manager);
        Some(outcome)
    }

    pub fn on_event<M: SessionManager + ?Sized>(&self, event: HermesEvent, manager: &mut M) {
        match event {
            HermesEvent::Intent(message) => {
                self.on_intent(&message, manager);
            }
            HermesEvent::SessionStarted(notice) => self.on_session_started(&notice),
            HermesEvent::SessionQueued(notice) => self.on_session_queued(&notice),
            HermesEvent::SessionEnded(notice) => self.on_session_ended(&notice),
            HermesEvent::Other(topic) => debug!("Unsubscribed topic {}", topic),
        }
    }

    // Lifecycle notifications are observed only, never answered.
    pub fn on_session_started(&self, notice: &SessionNotice) {
        log_notice("started", notice);
    }

    pub fn on_session_queued(&self, notice: &SessionNotice) {
        log_notice("queued", notice);
    }

    pub fn on_session_ended(&self, notice: &SessionNotice) {
        log_notice("ended", notice);
    }

    /// Async Driver Loop: one JSON message per input line, every resulting
    /// publish written as one JSON line. Ends at EOF.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Skill loop started. Config: {}", self.config_path.display());

        let mut lines = reader.lines();
        let mut session = RecordingSession::new();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            match wire::decode(&line) {
                Ok(event) => self.on_event(event, &mut session),
                Err(e) => {
                    warn!("Skipping message: {}", e);
                    continue;
                }
            }

            for action in session.take() {
                let mut out = serde_json::to_string(&action)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
            }
            writer.flush().await?;
        }

        info!("Input closed, skill loop stopped");
        Ok(())
    }
}

fn log_notice(phase: &str, notice: &SessionNotice) {
    let site_id = notice.site_id.as_deref().unwrap_or("default");
    let has_custom_data = notice.custom_data.is_some();
    match &notice.termination {
        Some(termination) => info!(
            session_id = %notice.session_id,
            site_id,
            has_custom_data,
            reason = %termination.reason,
            "Session {}", phase
        ),
        None => info!(
            session_id = %notice.session_id,
            site_id,
            has_custom_data,
            "Session {}", phase
        ),
    }
}
