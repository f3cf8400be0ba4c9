//! Persistence seam. The core reads profile data and writes chat/plan results
//! through `DataStore`; every lookup is scoped by the owning user id.
//!
//! `AppState` holds an `Arc<dyn DataStore>`: PostgreSQL in production,
//! an in-memory store in tests.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::chat::{ChatMessage, ChatMessageRow};
use crate::models::profile::{
    FacilityRow, HorseRow, IncompleteLessonRow, MethodPreferenceRow, MethodRatingRow, MethodRow,
    UserProfileRow,
};
use crate::models::training_plan::{PlanSource, TrainingPlanStructure};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgDataStore;

#[async_trait]
pub trait DataStore: Send + Sync {
    async fn user_profile(&self, user_id: Uuid) -> Result<Option<UserProfileRow>>;

    async fn method_preference(&self, user_id: Uuid) -> Result<Option<MethodPreferenceRow>>;

    async fn method_ratings(&self, user_id: Uuid) -> Result<Vec<MethodRatingRow>>;

    async fn horse(&self, user_id: Uuid, horse_id: Uuid) -> Result<Option<HorseRow>>;

    async fn first_active_horse(&self, user_id: Uuid) -> Result<Option<HorseRow>>;

    async fn facility(&self, user_id: Uuid, facility_id: Uuid) -> Result<Option<FacilityRow>>;

    async fn first_active_facility(&self, user_id: Uuid) -> Result<Option<FacilityRow>>;

    /// Batched lookup. Unknown ids are silently absent from the result.
    async fn methods_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MethodRow>>;

    /// Incomplete lessons of the user's active plan, in curriculum order.
    async fn incomplete_lessons(&self, user_id: Uuid) -> Result<Vec<IncompleteLessonRow>>;

    /// The last `limit` messages of a conversation, oldest first.
    async fn recent_chat_messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ChatMessageRow>>;

    async fn append_chat_messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        messages: &[ChatMessage],
    ) -> Result<()>;

    /// Stores the plan as the user's active plan, archiving any previous one.
    async fn save_training_plan(
        &self,
        user_id: Uuid,
        plan: &TrainingPlanStructure,
        source: PlanSource,
    ) -> Result<Uuid>;
}
