//! In-memory `DataStore` for tests.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::chat::{ChatMessage, ChatMessageRow};
use crate::models::profile::{
    FacilityRow, HorseRow, IncompleteLessonRow, MethodPreferenceRow, MethodRatingRow, MethodRow,
    UserProfileRow,
};
use crate::models::training_plan::{PlanSource, TrainingPlanStructure};
use crate::store::DataStore;

#[derive(Default)]
pub struct MemoryDataStore {
    pub profiles: Vec<UserProfileRow>,
    pub preferences: Vec<MethodPreferenceRow>,
    /// (user_id, rating)
    pub ratings: Vec<(Uuid, MethodRatingRow)>,
    pub horses: Vec<HorseRow>,
    pub facilities: Vec<FacilityRow>,
    pub methods: Vec<MethodRow>,
    /// (user_id, lesson)
    pub lessons: Vec<(Uuid, IncompleteLessonRow)>,
    pub chat: Mutex<Vec<ChatMessageRow>>,
    pub plans: Mutex<Vec<(Uuid, Uuid, PlanSource, TrainingPlanStructure)>>,
    /// When set, horse lookups fail to simulate an unavailable store.
    pub fail_horse_lookups: bool,
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn user_profile(&self, user_id: Uuid) -> Result<Option<UserProfileRow>> {
        Ok(self.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn method_preference(&self, user_id: Uuid) -> Result<Option<MethodPreferenceRow>> {
        Ok(self
            .preferences
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn method_ratings(&self, user_id: Uuid) -> Result<Vec<MethodRatingRow>> {
        Ok(self
            .ratings
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn horse(&self, user_id: Uuid, horse_id: Uuid) -> Result<Option<HorseRow>> {
        if self.fail_horse_lookups {
            return Err(anyhow!("horse table unavailable"));
        }
        Ok(self
            .horses
            .iter()
            .find(|h| h.id == horse_id && h.user_id == user_id)
            .cloned())
    }

    async fn first_active_horse(&self, user_id: Uuid) -> Result<Option<HorseRow>> {
        if self.fail_horse_lookups {
            return Err(anyhow!("horse table unavailable"));
        }
        Ok(self
            .horses
            .iter()
            .find(|h| h.user_id == user_id && h.is_active)
            .cloned())
    }

    async fn facility(&self, user_id: Uuid, facility_id: Uuid) -> Result<Option<FacilityRow>> {
        Ok(self
            .facilities
            .iter()
            .find(|f| f.id == facility_id && f.user_id == user_id)
            .cloned())
    }

    async fn first_active_facility(&self, user_id: Uuid) -> Result<Option<FacilityRow>> {
        Ok(self
            .facilities
            .iter()
            .find(|f| f.user_id == user_id && f.is_active)
            .cloned())
    }

    async fn methods_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MethodRow>> {
        Ok(self
            .methods
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }

    async fn incomplete_lessons(&self, user_id: Uuid) -> Result<Vec<IncompleteLessonRow>> {
        Ok(self
            .lessons
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, l)| l.clone())
            .collect())
    }

    async fn recent_chat_messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ChatMessageRow>> {
        let chat = self.chat.lock().map_err(|_| anyhow!("chat lock poisoned"))?;
        let rows: Vec<_> = chat
            .iter()
            .filter(|m| m.user_id == user_id && m.conversation_id == conversation_id)
            .cloned()
            .collect();
        let skip = rows.len().saturating_sub(limit.max(0) as usize);
        Ok(rows.into_iter().skip(skip).collect())
    }

    async fn append_chat_messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        messages: &[ChatMessage],
    ) -> Result<()> {
        let mut chat = self.chat.lock().map_err(|_| anyhow!("chat lock poisoned"))?;
        for message in messages {
            chat.push(ChatMessageRow {
                id: Uuid::new_v4(),
                conversation_id,
                user_id,
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn save_training_plan(
        &self,
        user_id: Uuid,
        plan: &TrainingPlanStructure,
        source: PlanSource,
    ) -> Result<Uuid> {
        let plan_id = Uuid::new_v4();
        let mut plans = self.plans.lock().map_err(|_| anyhow!("plan lock poisoned"))?;
        plans.push((plan_id, user_id, source, plan.clone()));
        Ok(plan_id)
    }
}
