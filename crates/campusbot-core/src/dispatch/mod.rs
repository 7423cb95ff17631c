//! Intent dispatch: an ordered chain of handlers over incoming messages.
//!
//! Each handler either produces a reply, suppresses the message outright, or
//! passes to the next handler. The chain short-circuits at the first
//! non-`Pass` outcome, so ordering is part of the observable contract: an
//! admin command that also contains a counter keyword is always treated as
//! an admin command.

mod admin;
mod canned;
mod counters;
mod memory;
mod silence;

pub use admin::AdminHandler;
pub use canned::{
    CannedMeals, CannedWeather, EmotionResponder, GraduationResponder, KeywordResponder,
    MealSource, ResponderHandler, WeatherSource,
};
pub use counters::{AilaHandler, YoshiHandler};
pub use memory::MemoryHandler;
pub use silence::{ActivationGate, SilenceHandler};

use crate::config::BotConfig;
use crate::error::BotResult;
use crate::state::BotState;
use crate::store::{MemoStore, ReminderStore};
use crate::types::IncomingMessage;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a single handler evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Handled: reply with this text, stop the chain.
    Reply(String),
    /// Handled: no reply at all, stop the chain (inactive bot, silence).
    Suppress,
    /// Not this handler's message; continue down the chain.
    Pass,
}

/// A single intent handler in the dispatch chain.
pub trait IntentHandler: Send + Sync {
    /// Handler name, for logging.
    fn name(&self) -> &'static str;

    /// Evaluate one message.
    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch>;
}

/// Evaluates messages against the ordered handler chain.
pub struct Dispatcher {
    handlers: Vec<Box<dyn IntentHandler>>,
}

impl Dispatcher {
    /// Build the standard chain: admin, activation gate, silence,
    /// memory/reminder commands, counters, then the canned responders.
    pub fn new(
        config: &BotConfig,
        state: Arc<BotState>,
        reminders: Arc<dyn ReminderStore>,
        memos: Arc<dyn MemoStore>,
        weather: Arc<dyn WeatherSource>,
        meals: Arc<dyn MealSource>,
    ) -> Self {
        let handlers: Vec<Box<dyn IntentHandler>> = vec![
            Box::new(AdminHandler::new(state.clone())),
            Box::new(ActivationGate::new(state.clone())),
            Box::new(SilenceHandler::new(state.clone(), config.silence_duration)),
            Box::new(MemoryHandler::new(reminders, memos)),
            Box::new(AilaHandler::new(state.clone(), weather.clone())),
            Box::new(YoshiHandler::new(state)),
            Box::new(ResponderHandler::friends()),
            Box::new(GraduationResponder::new()),
            Box::new(ResponderHandler::memes()),
            Box::new(EmotionResponder),
            Box::new(KeywordResponder::new(weather, meals)),
        ];
        Self { handlers }
    }

    /// Build a dispatcher from an explicit handler chain (for tests and
    /// custom deployments).
    pub fn with_handlers(handlers: Vec<Box<dyn IntentHandler>>) -> Self {
        Self { handlers }
    }

    /// Run the chain: first non-`Pass` outcome wins. Handler errors never
    /// break dispatch; a validation rejection becomes the reply text and
    /// anything else is logged and treated as a pass.
    pub fn dispatch(&self, msg: &IncomingMessage) -> Option<String> {
        for handler in &self.handlers {
            match handler.handle(msg) {
                Ok(Dispatch::Reply(reply)) => {
                    debug!(handler = handler.name(), "Message handled");
                    return Some(reply);
                }
                Ok(Dispatch::Suppress) => {
                    debug!(handler = handler.name(), "Message suppressed");
                    return None;
                }
                Ok(Dispatch::Pass) => continue,
                Err(err) => {
                    if let Some(reply) = err.chat_reply() {
                        return Some(reply.to_string());
                    }
                    warn!(handler = handler.name(), error = %err, "Handler failed, passing");
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use crate::store::{SqliteMemoStore, SqliteReminderStore};

    fn dispatcher_with_state(state: Arc<BotState>) -> Dispatcher {
        let config = BotConfig::default();
        Dispatcher::new(
            &config,
            state,
            Arc::new(SqliteReminderStore::in_memory().unwrap()),
            Arc::new(SqliteMemoStore::in_memory().unwrap()),
            Arc::new(CannedWeather),
            Arc::new(CannedMeals),
        )
    }

    fn msg(text: &str, sender: &str) -> IncomingMessage {
        IncomingMessage::new(text, sender, "테스트방")
    }

    #[test]
    fn test_no_match_yields_no_reply() {
        let dispatcher = dispatcher_with_state(Arc::new(BotState::new("박정욱")));
        assert!(dispatcher.dispatch(&msg("그냥 하는 말", "사용자1")).is_none());
    }

    #[test]
    fn test_inactive_suppresses_non_admin() {
        let state = Arc::new(BotState::new("박정욱"));
        state.set_active(false);
        let dispatcher = dispatcher_with_state(state);

        assert!(dispatcher.dispatch(&msg("아일라", "사용자1")).is_none());
        // Admin reactivation still works while inactive.
        let reply = dispatcher.dispatch(&msg("크하학 시작", "박정욱")).unwrap();
        assert_eq!(reply, "봇이 다시 활성화됐다!");
    }

    #[test]
    fn test_admin_command_bypasses_silence() {
        let dispatcher = dispatcher_with_state(Arc::new(BotState::new("박정욱")));

        let reply = dispatcher.dispatch(&msg("조용히 해", "사용자1")).unwrap();
        assert_eq!(reply, "..조용히 하겠다");
        assert!(dispatcher.dispatch(&msg("아일라", "사용자1")).is_none());

        // The admin handler sits before the silence gate, so admin commands
        // keep working while the bot is silent.
        let reply = dispatcher.dispatch(&msg("크하학 종료", "박정욱")).unwrap();
        assert!(reply.contains("비활성화"));
        let reply = dispatcher.dispatch(&msg("크하학 시작", "박정욱")).unwrap();
        assert_eq!(reply, "봇이 다시 활성화됐다!");

        // Reactivation also cleared the silence deadline.
        let reply = dispatcher.dispatch(&msg("아일라", "사용자1")).unwrap();
        assert_eq!(reply, "러닝 하러 가자");
    }

    #[test]
    fn test_earlier_handler_wins_on_keyword_overlap() {
        let dispatcher = dispatcher_with_state(Arc::new(BotState::new("박정욱")));

        // Both counter keywords in one message: the 아일라 handler sits
        // earlier in the chain and the 요시 handler never runs.
        let reply = dispatcher.dispatch(&msg("아일라 요시", "사용자1")).unwrap();
        assert_eq!(reply, "러닝 하러 가자");
    }

    #[test]
    fn test_memory_command_wins_over_counter_keyword() {
        let dispatcher = dispatcher_with_state(Arc::new(BotState::new("박정욱")));

        // The remember command also mentions a counter keyword; the memory
        // handler sits earlier in the chain.
        let reply = dispatcher.dispatch(&msg("!기억 아일라 생일", "사용자1")).unwrap();
        assert_eq!(reply, "'아일라 생일' 기억했다");
    }

    #[test]
    fn test_handler_error_falls_through() {
        struct Broken;
        impl IntentHandler for Broken {
            fn name(&self) -> &'static str {
                "broken"
            }
            fn handle(&self, _msg: &IncomingMessage) -> BotResult<Dispatch> {
                Err(BotError::internal("boom"))
            }
        }
        struct Echo;
        impl IntentHandler for Echo {
            fn name(&self) -> &'static str {
                "echo"
            }
            fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
                Ok(Dispatch::Reply(msg.message.clone()))
            }
        }

        let dispatcher = Dispatcher::with_handlers(vec![Box::new(Broken), Box::new(Echo)]);
        assert_eq!(
            dispatcher.dispatch(&msg("안녕", "사용자1")).as_deref(),
            Some("안녕")
        );
    }

    #[test]
    fn test_validation_rejection_becomes_reply() {
        let dispatcher = dispatcher_with_state(Arc::new(BotState::new("박정욱")));
        let reply = dispatcher
            .dispatch(&msg("!리마인드 내일 25:00 회의", "사용자1"))
            .unwrap();
        assert!(reply.contains("올바른 시간"));
    }
}
