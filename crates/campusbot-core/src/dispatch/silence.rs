//! Activation gate and silence handling.
//!
//! While silent the bot accepts only the resume phrases; every other
//! non-admin message yields no reply at all. Silence is total and
//! unannounced.

use crate::dispatch::{Dispatch, IntentHandler};
use crate::error::BotResult;
use crate::state::BotState;
use crate::types::IncomingMessage;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Phrases that put the bot into silence.
const SILENCE_PHRASES: [&str; 2] = ["조용히 해", "크하학 조용"];
/// Phrases that bring it back while silent.
const RESUME_PHRASES: [&str; 2] = ["이제 말해", "말해도 돼"];

/// Suppresses everything while the bot is deactivated. Admin commands are
/// handled before this gate runs.
pub struct ActivationGate {
    state: Arc<BotState>,
}

impl ActivationGate {
    pub fn new(state: Arc<BotState>) -> Self {
        Self { state }
    }
}

impl IntentHandler for ActivationGate {
    fn name(&self) -> &'static str {
        "activation-gate"
    }

    fn handle(&self, _msg: &IncomingMessage) -> BotResult<Dispatch> {
        if self.state.is_active() {
            Ok(Dispatch::Pass)
        } else {
            Ok(Dispatch::Suppress)
        }
    }
}

/// Silence entry and resume.
pub struct SilenceHandler {
    state: Arc<BotState>,
    silence_duration: Duration,
}

impl SilenceHandler {
    pub fn new(state: Arc<BotState>, silence_duration: Duration) -> Self {
        Self {
            state,
            silence_duration,
        }
    }
}

impl IntentHandler for SilenceHandler {
    fn name(&self) -> &'static str {
        "silence"
    }

    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let now = Utc::now();
        let text = msg.message.trim();

        if self.state.is_silent(now) {
            if RESUME_PHRASES.contains(&text) {
                self.state.clear_silence();
                info!(sender = %msg.sender, "Silence lifted");
                return Ok(Dispatch::Reply("알겠다. 다시 떠들겠다!".to_string()));
            }
            return Ok(Dispatch::Suppress);
        }

        if SILENCE_PHRASES.contains(&text) {
            let until = now
                + ChronoDuration::from_std(self.silence_duration)
                    .unwrap_or_else(|_| ChronoDuration::seconds(600));
            self.state.enter_silence(until);
            info!(sender = %msg.sender, until = %until, "Entering silence");
            return Ok(Dispatch::Reply("..조용히 하겠다".to_string()));
        }

        Ok(Dispatch::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> (SilenceHandler, Arc<BotState>) {
        let state = Arc::new(BotState::new("박정욱"));
        (
            SilenceHandler::new(state.clone(), Duration::from_secs(600)),
            state,
        )
    }

    fn msg(text: &str) -> IncomingMessage {
        IncomingMessage::new(text, "사용자1", "방")
    }

    #[test]
    fn test_silence_entry_and_total_suppression() {
        let (handler, state) = handler();

        let out = handler.handle(&msg("조용히 해")).unwrap();
        assert_eq!(out, Dispatch::Reply("..조용히 하겠다".to_string()));
        assert!(state.is_silent(Utc::now()));

        // Anything that is not a resume phrase is swallowed, not answered.
        assert_eq!(handler.handle(&msg("아일라")).unwrap(), Dispatch::Suppress);
        assert_eq!(handler.handle(&msg("뭐였지?")).unwrap(), Dispatch::Suppress);
        assert_eq!(
            handler.handle(&msg("조용히 해")).unwrap(),
            Dispatch::Suppress
        );
    }

    #[test]
    fn test_resume_phrase_lifts_silence_and_replies() {
        let (handler, state) = handler();
        handler.handle(&msg("조용히 해")).unwrap();

        let out = handler.handle(&msg("이제 말해")).unwrap();
        assert_eq!(out, Dispatch::Reply("알겠다. 다시 떠들겠다!".to_string()));
        assert!(!state.is_silent(Utc::now()));

        // Back to normal: unrelated messages pass down the chain again.
        assert_eq!(handler.handle(&msg("아일라")).unwrap(), Dispatch::Pass);
    }

    #[test]
    fn test_silence_expires_on_its_own() {
        let (handler, state) = handler();
        state.enter_silence(Utc::now() - ChronoDuration::seconds(1));
        assert_eq!(handler.handle(&msg("아일라")).unwrap(), Dispatch::Pass);
    }

    #[test]
    fn test_activation_gate() {
        let state = Arc::new(BotState::new("박정욱"));
        let gate = ActivationGate::new(state.clone());

        assert_eq!(gate.handle(&msg("아무거나")).unwrap(), Dispatch::Pass);
        state.set_active(false);
        assert_eq!(gate.handle(&msg("아무거나")).unwrap(), Dispatch::Suppress);
    }
}
