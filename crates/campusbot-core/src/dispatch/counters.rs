//! The two stateful running gags.
//!
//! These stay as two separate handlers on purpose: the 아일라 counter fires
//! two one-shots and resets, the 요시 counter warns until it turns hostile
//! and never resets. Folding them into one generic counter would change
//! observable behavior.

use crate::dispatch::{Dispatch, IntentHandler, WeatherSource};
use crate::error::BotResult;
use crate::state::{BotState, Counter};
use crate::types::IncomingMessage;
use std::sync::Arc;

/// "아일라": count 1 invites a run, count 2 answers with the running
/// weather and resets.
pub struct AilaHandler {
    state: Arc<BotState>,
    weather: Arc<dyn WeatherSource>,
}

impl AilaHandler {
    pub fn new(state: Arc<BotState>, weather: Arc<dyn WeatherSource>) -> Self {
        Self { state, weather }
    }
}

impl IntentHandler for AilaHandler {
    fn name(&self) -> &'static str {
        "counter-aila"
    }

    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        if !msg.message.contains("아일라") {
            return Ok(Dispatch::Pass);
        }

        match self.state.increment(Counter::Aila, &msg.sender) {
            1 => Ok(Dispatch::Reply("러닝 하러 가자".to_string())),
            _ => {
                self.state.reset_counter(Counter::Aila, &msg.sender);
                Ok(Dispatch::Reply(format!(
                    "러닝을 가기 위한 날씨\n {}\n",
                    self.weather.current()
                )))
            }
        }
    }
}

/// "요시": a warning on every mention until the third, which turns hostile.
/// The count keeps growing; it never resets on its own.
pub struct YoshiHandler {
    state: Arc<BotState>,
}

impl YoshiHandler {
    pub fn new(state: Arc<BotState>) -> Self {
        Self { state }
    }
}

impl IntentHandler for YoshiHandler {
    fn name(&self) -> &'static str {
        "counter-yoshi"
    }

    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        if !msg.message.contains("요시") {
            return Ok(Dispatch::Pass);
        }

        if self.state.increment(Counter::Yoshi, &msg.sender) >= 3 {
            Ok(Dispatch::Reply("요시가 화났다!!!(하하)".to_string()))
        } else {
            Ok(Dispatch::Reply("또 이상한 거 만드셨네..".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::CannedWeather;

    fn msg(text: &str, sender: &str) -> IncomingMessage {
        IncomingMessage::new(text, sender, "방")
    }

    fn reply(out: Dispatch) -> String {
        match out {
            Dispatch::Reply(r) => r,
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_aila_fires_twice_then_resets() {
        let state = Arc::new(BotState::new("박정욱"));
        let handler = AilaHandler::new(state.clone(), Arc::new(CannedWeather));

        let first = reply(handler.handle(&msg("아일라", "A")).unwrap());
        assert_eq!(first, "러닝 하러 가자");

        let second = reply(handler.handle(&msg("아일라", "A")).unwrap());
        assert!(second.contains("러닝을 가기 위한 날씨"));
        assert_eq!(state.counter(Counter::Aila, "A"), 0);

        // Third mention starts the cycle over.
        let third = reply(handler.handle(&msg("아일라", "A")).unwrap());
        assert_eq!(third, "러닝 하러 가자");
    }

    #[test]
    fn test_aila_counts_per_sender() {
        let state = Arc::new(BotState::new("박정욱"));
        let handler = AilaHandler::new(state, Arc::new(CannedWeather));

        assert_eq!(reply(handler.handle(&msg("아일라", "A")).unwrap()), "러닝 하러 가자");
        assert_eq!(reply(handler.handle(&msg("아일라", "B")).unwrap()), "러닝 하러 가자");
    }

    #[test]
    fn test_yoshi_never_resets() {
        let state = Arc::new(BotState::new("박정욱"));
        let handler = YoshiHandler::new(state.clone());

        assert_eq!(
            reply(handler.handle(&msg("요시", "A")).unwrap()),
            "또 이상한 거 만드셨네.."
        );
        assert_eq!(
            reply(handler.handle(&msg("요시", "A")).unwrap()),
            "또 이상한 거 만드셨네.."
        );
        for _ in 0..3 {
            assert_eq!(
                reply(handler.handle(&msg("요시", "A")).unwrap()),
                "요시가 화났다!!!(하하)"
            );
        }
        assert_eq!(state.counter(Counter::Yoshi, "A"), 5);
    }

    #[test]
    fn test_unrelated_message_passes() {
        let state = Arc::new(BotState::new("박정욱"));
        let handler = YoshiHandler::new(state);
        assert_eq!(handler.handle(&msg("안녕", "A")).unwrap(), Dispatch::Pass);
    }
}
