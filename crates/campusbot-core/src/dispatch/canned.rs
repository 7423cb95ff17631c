//! Canned responders: friends, memes, emotions, and the weather/meal
//! keyword routing.
//!
//! These are deliberately thin. The real weather and cafeteria lookups are
//! external HTTP wrappers owned by collaborators behind the `WeatherSource`
//! and `MealSource` traits; the defaults here answer with the offline
//! fallback lines.

use crate::dispatch::{Dispatch, IntentHandler};
use crate::error::BotResult;
use crate::types::IncomingMessage;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Current-weather text provider. Also feeds the second 아일라 reply.
pub trait WeatherSource: Send + Sync {
    fn current(&self) -> String;
}

/// Offline fallback weather.
pub struct CannedWeather;

impl WeatherSource for CannedWeather {
    fn current(&self) -> String {
        "서버 연결이 안 된다. 나중에 다시 시도해라.".to_string()
    }
}

/// Cafeteria menu text provider. `meal` is 아침/점심/저녁 or None for the
/// full day.
pub trait MealSource: Send + Sync {
    fn menu(&self, meal: Option<&str>) -> String;
}

/// Offline fallback menu.
pub struct CannedMeals;

impl MealSource for CannedMeals {
    fn menu(&self, _meal: Option<&str>) -> String {
        "서버 연결이 안 된다. 나중에 다시 시도해라.".to_string()
    }
}

/// Substring-table responder: first matching entry wins.
pub struct ResponderHandler {
    name: &'static str,
    table: &'static [(&'static str, &'static str)],
}

impl ResponderHandler {
    /// Friend-name reactions.
    pub fn friends() -> Self {
        Self {
            name: "friends",
            table: &[
                ("하리", "허리 조심해라"),
                ("김예준", "바보"),
                ("줄리엔", "많이 먹는다"),
            ],
        }
    }

    /// Meme reactions.
    pub fn memes() -> Self {
        Self {
            name: "memes",
            table: &[
                ("아..", "글쿤.."),
                ("안사요", "이걸 안 사?"),
                ("응애", "귀여운척 하지 마세요;;"),
                ("불편", "불편해?\n불편하면 자세를 고쳐앉아!\n보는 자세가 불편하니깐 그런거아냐!!"),
                ("배고파", "또 먹어?"),
                ("멈춰", "멈춰!!"),
            ],
        }
    }
}

impl IntentHandler for ResponderHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        for (pattern, reply) in self.table {
            if msg.message.contains(pattern) {
                return Ok(Dispatch::Reply((*reply).to_string()));
            }
        }
        Ok(Dispatch::Pass)
    }
}

/// Countdown replies toward two fixed campus dates: the last academy day
/// and the start of the ski training camp. 아카데미 wins when both keywords
/// appear.
pub struct GraduationResponder {
    academy_end: NaiveDateTime,
    camp_start: NaiveDateTime,
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid calendar date")
}

fn split_remaining(secs: i64) -> (i64, i64, i64) {
    let days = secs / 86_400;
    let rem = secs % 86_400;
    (days, rem / 3_600, rem % 3_600 / 60)
}

// abs(floor(secs / day)) for a past instant, matching "N days ago".
fn days_ago(past_secs: i64) -> i64 {
    (past_secs + 86_399) / 86_400
}

impl GraduationResponder {
    pub fn new() -> Self {
        Self {
            academy_end: midnight(2025, 12, 12),
            camp_start: midnight(2026, 1, 5),
        }
    }

    fn academy_line(&self, now: NaiveDateTime) -> String {
        let diff = (self.academy_end - now).num_seconds();
        if diff > 0 {
            let (d, h, m) = split_remaining(diff);
            if d > 0 {
                format!("아카데미 마지막까지 {}일 {}시간 {}분 남았다", d, h, m)
            } else {
                format!("아카데미 마지막까지 {}시간 {}분 남았다", h, m)
            }
        } else if diff > -86_400 {
            "오늘이 아카데미 마지막날이다".to_string()
        } else {
            format!("아카데미가 {}일 전에 끝났다", days_ago(-diff))
        }
    }

    fn camp_line(&self, now: NaiveDateTime) -> String {
        let diff = (self.camp_start - now).num_seconds();
        if diff > 0 {
            let (d, h, m) = split_remaining(diff);
            if d > 0 {
                format!("용평 갈 때까지 {}일 {}시간 {}분 남았다", d, h, m)
            } else {
                format!("용평 갈 때까지 {}시간 {}분 남았다", h, m)
            }
        } else if diff > -86_400 {
            "합숙 시작함. 예린이 말 잘 들으셈.".to_string()
        } else {
            format!("합숙은 {}일 전에 끝났다", days_ago(-diff))
        }
    }
}

impl Default for GraduationResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentHandler for GraduationResponder {
    fn name(&self) -> &'static str {
        "graduation"
    }

    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let now = Local::now().naive_local();
        if msg.message.contains("아카데미") {
            return Ok(Dispatch::Reply(self.academy_line(now)));
        }
        if msg.message.contains("합숙") {
            return Ok(Dispatch::Reply(self.camp_line(now)));
        }
        Ok(Dispatch::Pass)
    }
}

/// Emotion reactions driven by character counts rather than keywords.
pub struct EmotionResponder;

impl IntentHandler for EmotionResponder {
    fn name(&self) -> &'static str {
        "emotions"
    }

    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let text = &msg.message;

        if text.contains("나가") {
            return Ok(Dispatch::Reply("죄송합니다".to_string()));
        }

        let crying = text.chars().filter(|c| "ㅠㅜ".contains(*c)).count();
        if crying >= 2 {
            return Ok(Dispatch::Reply("뭘 울어요;;".to_string()));
        }

        let laughing = text.chars().filter(|c| "ㅋㄱㄲㄴㅌㅎ".contains(*c)).count();
        if laughing >= 5 {
            return Ok(Dispatch::Reply("뭘 웃어요;;".to_string()));
        }

        let stressed = text.chars().filter(|c| ";:,.".contains(*c)).count();
        if stressed >= 4 {
            return Ok(Dispatch::Reply("어림도 없지".to_string()));
        }

        Ok(Dispatch::Pass)
    }
}

/// Exact-match and substring keyword routing for the 크하학 pair and the
/// weather/meal collaborators. Last in the chain.
pub struct KeywordResponder {
    weather: Arc<dyn WeatherSource>,
    meals: Arc<dyn MealSource>,
}

impl KeywordResponder {
    pub fn new(weather: Arc<dyn WeatherSource>, meals: Arc<dyn MealSource>) -> Self {
        Self { weather, meals }
    }
}

const WEATHER_KEYWORDS: [&str; 7] = ["날씨", "기온", "온도", "비", "눈", "바람", "습도"];

impl IntentHandler for KeywordResponder {
    fn name(&self) -> &'static str {
        "keywords"
    }

    fn handle(&self, msg: &IncomingMessage) -> BotResult<Dispatch> {
        let text = msg.message.trim();

        if WEATHER_KEYWORDS.iter().any(|k| text.contains(k)) {
            return Ok(Dispatch::Reply(self.weather.current()));
        }

        match text {
            "크하학" => Ok(Dispatch::Reply(
                "KHH KHH KHH KHH KHH KHH KHH KHH KHH KHH KHH KHH KHH".to_string(),
            )),
            "KHH" => Ok(Dispatch::Reply("크하학 크하학".to_string())),
            "학식" => Ok(Dispatch::Reply(self.meals.menu(None))),
            "아침" | "점심" | "저녁" => Ok(Dispatch::Reply(self.meals.menu(Some(text)))),
            _ => Ok(Dispatch::Pass),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> IncomingMessage {
        IncomingMessage::new(text, "사용자1", "방")
    }

    fn reply(out: Dispatch) -> String {
        match out {
            Dispatch::Reply(r) => r,
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_friend_substring_match() {
        let handler = ResponderHandler::friends();
        assert_eq!(
            reply(handler.handle(&msg("하리 어디감")).unwrap()),
            "허리 조심해라"
        );
        assert_eq!(handler.handle(&msg("안녕")).unwrap(), Dispatch::Pass);
    }

    #[test]
    fn test_countdown_before_during_after() {
        let handler = GraduationResponder::new();

        // A day and a half out: full days/hours/minutes line.
        let now = midnight(2025, 12, 10) + chrono::Duration::hours(12) + chrono::Duration::minutes(30);
        assert_eq!(
            handler.academy_line(now),
            "아카데미 마지막까지 1일 11시간 30분 남았다"
        );

        // Under a day: the day count is omitted.
        let now = midnight(2026, 1, 4) + chrono::Duration::hours(23);
        assert_eq!(handler.camp_line(now), "용평 갈 때까지 1시간 0분 남았다");

        // Inside the final day.
        let now = midnight(2025, 12, 12) + chrono::Duration::hours(10);
        assert_eq!(handler.academy_line(now), "오늘이 아카데미 마지막날이다");

        // Well past.
        let now = midnight(2025, 12, 14);
        assert_eq!(handler.academy_line(now), "아카데미가 2일 전에 끝났다");
        let now = midnight(2026, 1, 7) + chrono::Duration::hours(6);
        assert_eq!(handler.camp_line(now), "합숙은 3일 전에 끝났다");
    }

    #[test]
    fn test_countdown_keyword_routing() {
        let handler = GraduationResponder::new();

        let out = handler.handle(&msg("아카데미 언제 끝나")).unwrap();
        assert!(matches!(out, Dispatch::Reply(ref r) if r.contains("아카데미")));

        // 아카데미 is checked before 합숙 when both appear.
        let out = handler.handle(&msg("아카데미 합숙 일정")).unwrap();
        assert!(matches!(out, Dispatch::Reply(ref r) if r.contains("아카데미")));

        assert_eq!(handler.handle(&msg("졸업 언제야")).unwrap(), Dispatch::Pass);
        assert_eq!(handler.handle(&msg("안녕")).unwrap(), Dispatch::Pass);
    }

    #[test]
    fn test_emotion_thresholds() {
        let handler = EmotionResponder;
        assert_eq!(reply(handler.handle(&msg("ㅠㅠ")).unwrap()), "뭘 울어요;;");
        // One tear is not enough.
        assert_eq!(handler.handle(&msg("아ㅠ")).unwrap(), Dispatch::Pass);
        assert_eq!(
            reply(handler.handle(&msg("ㅋㅋㅋㅋㅋ")).unwrap()),
            "뭘 웃어요;;"
        );
        assert_eq!(handler.handle(&msg("ㅋㅋ")).unwrap(), Dispatch::Pass);
        assert_eq!(reply(handler.handle(&msg("아;;;;")).unwrap()), "어림도 없지");
        assert_eq!(reply(handler.handle(&msg("나가주세요")).unwrap()), "죄송합니다");
    }

    #[test]
    fn test_keyword_exact_pairs() {
        let handler = KeywordResponder::new(Arc::new(CannedWeather), Arc::new(CannedMeals));
        assert!(reply(handler.handle(&msg("크하학")).unwrap()).starts_with("KHH"));
        assert_eq!(reply(handler.handle(&msg("KHH")).unwrap()), "크하학 크하학");
        // Exact match only: longer text passes.
        assert_eq!(handler.handle(&msg("크하학!!")).unwrap(), Dispatch::Pass);
    }

    #[test]
    fn test_weather_and_meal_routing() {
        let handler = KeywordResponder::new(Arc::new(CannedWeather), Arc::new(CannedMeals));
        assert!(reply(handler.handle(&msg("오늘 날씨 어때")).unwrap()).contains("서버 연결"));
        assert!(reply(handler.handle(&msg("학식")).unwrap()).contains("서버 연결"));
        assert!(reply(handler.handle(&msg("점심")).unwrap()).contains("서버 연결"));
    }
}
