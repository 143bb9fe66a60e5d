use chime_domain::UserHabits;

/// Source of learned user habits. Only consulted as a lead time hint.
#[async_trait::async_trait]
pub trait IHabitAnalyzer: Send + Sync {
    async fn get_user_habits(&self, user_id: i64) -> anyhow::Result<Option<UserHabits>>;
}
