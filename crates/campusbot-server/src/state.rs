//! Server state management.

use std::sync::Arc;

use campusbot_core::dispatch::{CannedMeals, CannedWeather};
use campusbot_core::{
    BotConfig, BotResult, BotState, Dispatcher, MemoStore, ReminderScheduler, ReminderStore,
    SqliteMemoStore, SqliteReminderStore,
};

/// Shared application state: the stores, dispatcher, and scheduler behind
/// every route. Cheap to clone; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BotConfig>,
    pub bot: Arc<BotState>,
    pub reminders: Arc<dyn ReminderStore>,
    pub memos: Arc<dyn MemoStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub scheduler: Arc<ReminderScheduler>,
}

impl AppState {
    /// Wire up the full state from a config: sqlite stores (file-backed
    /// when `db_path` is set, in-memory otherwise), the standard dispatch
    /// chain with the offline weather/meal fallbacks, and the scheduler.
    pub fn from_config(config: BotConfig) -> BotResult<Self> {
        // Each store keeps its own connection, so they get separate files.
        let (reminders, memos): (Arc<dyn ReminderStore>, Arc<dyn MemoStore>) =
            match &config.db_path {
                Some(path) => (
                    Arc::new(SqliteReminderStore::new(path)?),
                    Arc::new(SqliteMemoStore::new(format!("{}.memos", path))?),
                ),
                None => (
                    Arc::new(SqliteReminderStore::in_memory()?),
                    Arc::new(SqliteMemoStore::in_memory()?),
                ),
            };

        let bot = Arc::new(BotState::new(&config.admin_sender));
        let dispatcher = Arc::new(Dispatcher::new(
            &config,
            bot.clone(),
            reminders.clone(),
            memos.clone(),
            Arc::new(CannedWeather),
            Arc::new(CannedMeals),
        ));
        let scheduler = Arc::new(ReminderScheduler::new(reminders.clone(), &config));

        Ok(Self {
            config: Arc::new(config),
            bot,
            reminders,
            memos,
            dispatcher,
            scheduler,
        })
    }
}
