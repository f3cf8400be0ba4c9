use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::chat::{ChatMessage, ChatMessageRow};
use crate::models::profile::{
    FacilityRow, HorseRow, IncompleteLessonRow, MethodPreferenceRow, MethodRatingRow, MethodRow,
    UserProfileRow,
};
use crate::models::training_plan::{PlanSource, TrainingPlanStructure};
use crate::store::DataStore;

const HORSE_COLUMNS: &str = "id, user_id, name, breed, age_range, temperament, energy_level, \
    known_issues, injuries, past_trauma, training_level, is_active";

const FACILITY_COLUMNS: &str = "id, user_id, name, facility_type, arena_type, has_round_pen, \
    has_indoor_arena, has_trail_access, available_equipment, constraints, is_active";

/// `DataStore` backed by PostgreSQL. Schema: `migrations/0001_initial.sql`.
#[derive(Clone)]
pub struct PgDataStore {
    pool: PgPool,
}

impl PgDataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DataStore for PgDataStore {
    async fn user_profile(&self, user_id: Uuid) -> Result<Option<UserProfileRow>> {
        Ok(sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT user_id, experience_level, learning_style, risk_tolerance,
                   physical_limitations, primary_goal, experienced_methods
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn method_preference(&self, user_id: Uuid) -> Result<Option<MethodPreferenceRow>> {
        Ok(sqlx::query_as::<_, MethodPreferenceRow>(
            r#"
            SELECT user_id, preference_mode, selected_method_ids, primary_method_id, show_comparisons
            FROM method_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn method_ratings(&self, user_id: Uuid) -> Result<Vec<MethodRatingRow>> {
        Ok(sqlx::query_as::<_, MethodRatingRow>(
            r#"
            SELECT method_id, comfort_level, years_experience
            FROM method_ratings
            WHERE user_id = $1
            ORDER BY updated_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn horse(&self, user_id: Uuid, horse_id: Uuid) -> Result<Option<HorseRow>> {
        Ok(sqlx::query_as::<_, HorseRow>(&format!(
            "SELECT {HORSE_COLUMNS} FROM horses WHERE id = $1 AND user_id = $2"
        ))
        .bind(horse_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn first_active_horse(&self, user_id: Uuid) -> Result<Option<HorseRow>> {
        Ok(sqlx::query_as::<_, HorseRow>(&format!(
            "SELECT {HORSE_COLUMNS} FROM horses \
             WHERE user_id = $1 AND is_active \
             ORDER BY created_at ASC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn facility(&self, user_id: Uuid, facility_id: Uuid) -> Result<Option<FacilityRow>> {
        Ok(sqlx::query_as::<_, FacilityRow>(&format!(
            "SELECT {FACILITY_COLUMNS} FROM facilities WHERE id = $1 AND user_id = $2"
        ))
        .bind(facility_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn first_active_facility(&self, user_id: Uuid) -> Result<Option<FacilityRow>> {
        Ok(sqlx::query_as::<_, FacilityRow>(&format!(
            "SELECT {FACILITY_COLUMNS} FROM facilities \
             WHERE user_id = $1 AND is_active \
             ORDER BY created_at ASC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn methods_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MethodRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(sqlx::query_as::<_, MethodRow>(
            r#"
            SELECT id, name, category, philosophy, key_principles, terminology
            FROM horsemanship_methods
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn incomplete_lessons(&self, user_id: Uuid) -> Result<Vec<IncompleteLessonRow>> {
        Ok(sqlx::query_as::<_, IncompleteLessonRow>(
            r#"
            SELECT l.title, l.phase_name, l.module_name
            FROM training_plan_lessons l
            JOIN training_plans p ON p.id = l.plan_id
            WHERE p.user_id = $1 AND p.status = 'active' AND NOT l.completed
            ORDER BY l.position ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn recent_chat_messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ChatMessageRow>> {
        Ok(sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT * FROM (
                SELECT id, conversation_id, user_id, role, content, created_at
                FROM chat_messages
                WHERE user_id = $1 AND conversation_id = $2
                ORDER BY created_at DESC
                LIMIT $3
            ) recent
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn append_chat_messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        messages: &[ChatMessage],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for message in messages {
            // clock_timestamp() keeps rows of one transaction in insertion order.
            sqlx::query(
                r#"
                INSERT INTO chat_messages (id, conversation_id, user_id, role, content, created_at)
                VALUES ($1, $2, $3, $4, $5, clock_timestamp())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(conversation_id)
            .bind(user_id)
            .bind(message.role.as_str())
            .bind(&message.content)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn save_training_plan(
        &self,
        user_id: Uuid,
        plan: &TrainingPlanStructure,
        source: PlanSource,
    ) -> Result<Uuid> {
        let plan_id = Uuid::new_v4();
        let plan_json = serde_json::to_value(plan).context("Failed to serialize training plan")?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE training_plans SET status = 'archived' WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO training_plans (id, user_id, source, plan, status)
            VALUES ($1, $2, $3, $4, 'active')
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .bind(source.as_str())
        .bind(&plan_json)
        .execute(&mut *tx)
        .await?;

        let mut position: i32 = 0;
        for phase in &plan.phases {
            for module in &phase.modules {
                for lesson in &module.lessons {
                    sqlx::query(
                        r#"
                        INSERT INTO training_plan_lessons
                            (plan_id, position, title, phase_name, module_name, completed)
                        VALUES ($1, $2, $3, $4, $5, FALSE)
                        "#,
                    )
                    .bind(plan_id)
                    .bind(position)
                    .bind(&lesson.title)
                    .bind(&phase.phase_name)
                    .bind(&module.module_name)
                    .execute(&mut *tx)
                    .await?;
                    position += 1;
                }
            }
        }

        tx.commit().await?;

        info!(
            "Saved {} training plan {plan_id} with {} lessons for user {user_id}",
            source.as_str(),
            position
        );
        Ok(plan_id)
    }
}
