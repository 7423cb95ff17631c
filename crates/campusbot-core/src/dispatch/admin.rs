//! Admin commands: activate/deactivate/status.
//!
//! Sits first in the chain so it works even while the bot is inactive or
//! silenced.

use crate::dispatch::{Dispatch, IntentHandler};
use crate::error::BotResult;
use crate::state::BotState;
use crate::types::IncomingMessage;
use std::sync::Arc;
use tracing::info;

const CMD_DEACTIVATE: &str = "크하학 종료";
const CMD_ACTIVATE: &str = "크하학 시작";
const CMD_STATUS: &str = "봇 상태";

pub struct AdminHandler {
    state: Arc<BotState>,
}

impl AdminHandler {
    pub fn new(state: Arc<BotState>) -> Self {
        Self { state }
    }
}

impl IntentHandler for AdminHandler {
    fn name(&self) -> &'static str {
        "admin"
    }

    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let text = msg.message.trim();

        match text {
            CMD_DEACTIVATE | CMD_ACTIVATE => {
                if !self.state.authorize_admin(&msg.sender) {
                    // Mutating admin command from a non-admin: rejected, no
                    // state change.
                    info!(sender = %msg.sender, command = text, "Admin command rejected");
                    return Ok(Dispatch::Reply("권한이 없다. 관리자만 가능하다.".to_string()));
                }

                if text == CMD_DEACTIVATE {
                    self.state.set_active(false);
                    info!(sender = %msg.sender, "Bot deactivated");
                    Ok(Dispatch::Reply(
                        "봇이 비활성화됐다. '크하학 시작'으로 다시 켤 수 있다.".to_string(),
                    ))
                } else {
                    self.state.set_active(true);
                    self.state.clear_silence();
                    info!(sender = %msg.sender, "Bot activated");
                    Ok(Dispatch::Reply("봇이 다시 활성화됐다!".to_string()))
                }
            }
            CMD_STATUS if self.state.authorize_admin(&msg.sender) => {
                let status = if self.state.is_active() {
                    "활성화"
                } else {
                    "비활성화"
                };
                Ok(Dispatch::Reply(format!("현재 봇 상태: {}", status)))
            }
            _ => Ok(Dispatch::Pass),
        }
    }
}
