//! Memory and reminder chat commands.
//!
//! Prefix-keyed command surface:
//! - `!기억 <text>` — remember, room-scoped
//! - `뭐였` — recall, room-scoped
//! - `뭐더라` — recall, sender-scoped
//! - `!삭제 방별|개인` — delete a memo
//! - `!리마인드 <오늘|내일> <HH:MM> <text>` — create a reminder
//! - messages mentioning 오늘/내일 — due-reminder check

use crate::dispatch::{Dispatch, IntentHandler};
use crate::error::{BotError, BotResult};
use crate::store::{MemoStore, ReminderStore};
use crate::types::{IncomingMessage, MemoScope};
use chrono::{Duration, Local, NaiveTime, TimeZone, Utc};
use std::sync::Arc;

const USAGE_REMIND: &str = "사용법: !리마인드 내일 14:30 회의내용 또는 !리마인드 오늘 18:00 약속내용";
const USAGE_DELETE: &str = "사용법: !삭제 방별 또는 !삭제 개인";

pub struct MemoryHandler {
    reminders: Arc<dyn ReminderStore>,
    memos: Arc<dyn MemoStore>,
}

impl MemoryHandler {
    pub fn new(reminders: Arc<dyn ReminderStore>, memos: Arc<dyn MemoStore>) -> Self {
        Self { reminders, memos }
    }

    fn remember(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let text = msg
            .message
            .replace("!기억해", "")
            .replace("!기억", "")
            .trim()
            .to_string();
        if text.is_empty() {
            return Ok(Dispatch::Pass);
        }
        self.memos.set(MemoScope::Room, &msg.room, &text)?;
        Ok(Dispatch::Reply(format!("'{}' 기억했다", text)))
    }

    fn recall_room(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let reply = match self.memos.get(MemoScope::Room, &msg.room)? {
            Some(value) => format!("{}\\m아마 이거일 듯?", value),
            None => "이 방에서 기억한 게 없다".to_string(),
        };
        Ok(Dispatch::Reply(reply))
    }

    fn recall_personal(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let reply = match self.memos.get(MemoScope::Personal, &msg.sender)? {
            Some(value) => format!("{}\\m^^7", value),
            None => "기억나는 게 없다".to_string(),
        };
        Ok(Dispatch::Reply(reply))
    }

    fn delete(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let target = msg.message.replace("!삭제", "").trim().to_string();

        let reply = match target.as_str() {
            "방별" | "" => match self.memos.delete(MemoScope::Room, &msg.room)? {
                Some(prior) => format!("'{}' 삭제했다", prior),
                None => "이 방에서 기억한 게 없다".to_string(),
            },
            "개인" => match self.memos.delete(MemoScope::Personal, &msg.sender)? {
                Some(prior) => format!("개인 메모 '{}' 삭제했다", prior),
                None => "개인 메모가 없다".to_string(),
            },
            _ => USAGE_DELETE.to_string(),
        };
        Ok(Dispatch::Reply(reply))
    }

    fn remind(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let content = msg.message.replace("!리마인드", "").trim().to_string();
        if content.is_empty() {
            return Ok(Dispatch::Reply(USAGE_REMIND.to_string()));
        }

        let parts: Vec<&str> = content.splitn(3, ' ').collect();
        if parts.len() < 3 {
            return Ok(Dispatch::Reply(USAGE_REMIND.to_string()));
        }
        let (day_str, time_str, reminder_content) = (parts[0], parts[1], parts[2]);

        let day_offset = match day_str {
            "오늘" => 0,
            "내일" => 1,
            _ => {
                return Ok(Dispatch::Reply(
                    "날짜는 '오늘' 또는 '내일'만 가능하다".to_string(),
                ))
            }
        };

        if !time_str.contains(':') {
            return Ok(Dispatch::Reply("시간 형식: 14:30 또는 18:00".to_string()));
        }
        let (hour, minute) = match parse_hh_mm(time_str) {
            Some(hm) => hm,
            None => {
                return Ok(Dispatch::Reply("시간 형식이 잘못됐다. 예: 14:30".to_string()))
            }
        };
        if hour > 23 || minute > 59 {
            return Ok(Dispatch::Reply(
                "올바른 시간을 입력해라 (00:00 ~ 23:59)".to_string(),
            ));
        }

        // Reminder times are given in the bot's local timezone.
        let target_date = (Local::now() + Duration::days(day_offset)).date_naive();
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| BotError::validation("unrepresentable time"))?;
        let due_local = Local
            .from_local_datetime(&target_date.and_time(time))
            .single()
            .ok_or_else(|| {
                BotError::validation_with_reply(
                    "ambiguous local time",
                    "시간 형식이 잘못됐다. 예: 14:30",
                )
            })?;
        let due_at = due_local.with_timezone(&Utc);

        match self
            .reminders
            .create(due_at, reminder_content, &msg.room, &msg.sender)
        {
            Ok(reminder) => {
                let formatted = reminder
                    .due_at
                    .with_timezone(&Local)
                    .format("%m월 %d일 %H:%M");
                Ok(Dispatch::Reply(format!(
                    "'{}' 리마인드를 {}에 설정했다",
                    reminder.content, formatted
                )))
            }
            Err(err) => match err.chat_reply() {
                Some(reply) => Ok(Dispatch::Reply(reply.to_string())),
                None => Err(err),
            },
        }
    }

    fn check_due(&self) -> BotResult<Dispatch> {
        let due = self.reminders.pop_due(Utc::now())?;
        if due.is_empty() {
            return Ok(Dispatch::Pass);
        }
        let lines: Vec<String> = due.iter().map(|r| r.trigger_line()).collect();
        Ok(Dispatch::Reply(lines.join("\n")))
    }
}

fn parse_hh_mm(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.split_once(':')?;
    Some((h.trim().parse().ok()?, m.trim().parse().ok()?))
}

impl IntentHandler for MemoryHandler {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let text = &msg.message;
        if text.contains("!기억") {
            return self.remember(msg);
        }
        if text.contains("뭐였") {
            return self.recall_room(msg);
        }
        if text.contains("뭐더라") {
            return self.recall_personal(msg);
        }
        if text.contains("!삭제") {
            return self.delete(msg);
        }
        if text.contains("!리마인드") {
            return self.remind(msg);
        }
        if text.contains("내일") || text.contains("오늘") {
            return self.check_due();
        }
        Ok(Dispatch::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SqliteMemoStore, SqliteReminderStore};

    fn handler() -> (MemoryHandler, Arc<SqliteReminderStore>, Arc<SqliteMemoStore>) {
        let reminders = Arc::new(SqliteReminderStore::in_memory().unwrap());
        let memos = Arc::new(SqliteMemoStore::in_memory().unwrap());
        (
            MemoryHandler::new(reminders.clone(), memos.clone()),
            reminders,
            memos,
        )
    }

    fn msg(text: &str) -> IncomingMessage {
        IncomingMessage::new(text, "사용자1", "테스트방")
    }

    fn reply(out: Dispatch) -> String {
        match out {
            Dispatch::Reply(r) => r,
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_remember_and_recall_room() {
        let (handler, _, _) = handler();

        let out = reply(handler.handle(&msg("!기억 점심약속 2시")).unwrap());
        assert_eq!(out, "'점심약속 2시' 기억했다");

        let out = reply(handler.handle(&msg("뭐였지?")).unwrap());
        assert_eq!(out, "점심약속 2시\\m아마 이거일 듯?");
    }

    #[test]
    fn test_recall_misses() {
        let (handler, _, _) = handler();
        assert_eq!(
            reply(handler.handle(&msg("뭐였지?")).unwrap()),
            "이 방에서 기억한 게 없다"
        );
        assert_eq!(
            reply(handler.handle(&msg("그거 뭐더라")).unwrap()),
            "기억나는 게 없다"
        );
    }

    #[test]
    fn test_recall_personal() {
        let (handler, _, memos) = handler();
        memos.set(MemoScope::Personal, "사용자1", "사물함 비번 1234").unwrap();

        assert_eq!(
            reply(handler.handle(&msg("그거 뭐더라")).unwrap()),
            "사물함 비번 1234\\m^^7"
        );
    }

    #[test]
    fn test_delete_room_memo() {
        let (handler, _, _) = handler();
        handler.handle(&msg("!기억 점심약속")).unwrap();

        assert_eq!(
            reply(handler.handle(&msg("!삭제 방별")).unwrap()),
            "'점심약속' 삭제했다"
        );
        // Deleting again is a polite miss, not an error.
        assert_eq!(
            reply(handler.handle(&msg("!삭제 방별")).unwrap()),
            "이 방에서 기억한 게 없다"
        );
    }

    #[test]
    fn test_delete_personal_memo() {
        let (handler, _, memos) = handler();
        memos.set(MemoScope::Personal, "사용자1", "메모").unwrap();

        assert_eq!(
            reply(handler.handle(&msg("!삭제 개인")).unwrap()),
            "개인 메모 '메모' 삭제했다"
        );
        assert_eq!(
            reply(handler.handle(&msg("!삭제 개인")).unwrap()),
            "개인 메모가 없다"
        );
    }

    #[test]
    fn test_delete_unknown_target() {
        let (handler, _, _) = handler();
        assert_eq!(reply(handler.handle(&msg("!삭제 전부")).unwrap()), USAGE_DELETE);
    }

    #[test]
    fn test_remind_creates_future_reminder() {
        let (handler, reminders, _) = handler();

        // 23:59 tomorrow is always in the future.
        let out = reply(handler.handle(&msg("!리마인드 내일 23:59 회의 있음")).unwrap());
        assert!(out.contains("'회의 있음' 리마인드를"));
        assert!(out.contains("에 설정했다"));

        let stored = reminders.list(Some("테스트방")).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].content, "회의 있음");
        assert_eq!(stored[0].sender, "사용자1");
    }

    #[test]
    fn test_remind_usage_errors() {
        let (handler, _, _) = handler();

        assert_eq!(reply(handler.handle(&msg("!리마인드")).unwrap()), USAGE_REMIND);
        assert_eq!(
            reply(handler.handle(&msg("!리마인드 내일 14:30")).unwrap()),
            USAGE_REMIND
        );
        assert_eq!(
            reply(handler.handle(&msg("!리마인드 모레 14:30 회의")).unwrap()),
            "날짜는 '오늘' 또는 '내일'만 가능하다"
        );
        assert_eq!(
            reply(handler.handle(&msg("!리마인드 내일 1430 회의")).unwrap()),
            "시간 형식: 14:30 또는 18:00"
        );
        assert_eq!(
            reply(handler.handle(&msg("!리마인드 내일 ab:cd 회의")).unwrap()),
            "시간 형식이 잘못됐다. 예: 14:30"
        );
        assert_eq!(
            reply(handler.handle(&msg("!리마인드 내일 25:00 회의")).unwrap()),
            "올바른 시간을 입력해라 (00:00 ~ 23:59)"
        );
    }

    #[test]
    fn test_due_query_pops_triggered_reminders() {
        let (handler, reminders, _) = handler();

        // Nothing due: the mention of 오늘 falls through.
        assert_eq!(handler.handle(&msg("오늘 뭐하지")).unwrap(), Dispatch::Pass);

        // A reminder due one second from now enters its trigger window
        // almost immediately.
        let due = Utc::now() + Duration::seconds(1);
        reminders.create(due, "회의", "테스트방", "사용자1").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));

        let out = reply(handler.handle(&msg("오늘 일정 있나")).unwrap());
        assert!(out.contains("리마인드: 회의"));

        // Popped means gone.
        assert_eq!(handler.handle(&msg("오늘 일정 있나")).unwrap(), Dispatch::Pass);
    }
}
