use sea_orm::sea_query::OnConflict;
use serde::Deserialize;

use crate::{
  entity::{skill, user_skill},
  prelude::*,
  progress,
};

#[derive(Debug, Deserialize)]
pub struct NewSkill {
  pub name: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
  pub tags: Option<json::Value>,
}

pub struct Skill<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Skill<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(&self, new: NewSkill) -> Result<skill::Model> {
    let name = new.name.trim();
    if name.is_empty() {
      return Err(Error::bad_request("Skill name is required"));
    }

    let taken = skill::Entity::find()
      .filter(skill::Column::Name.eq(name))
      .one(self.db)
      .await?;
    if taken.is_some() {
      return Err(Error::bad_request(format!("Skill `{name}` already exists")));
    }

    let skill = skill::ActiveModel {
      skill_id: Set(Uuid::new_v4()),
      name: Set(name.to_string()),
      description: Set(new.description),
      image_url: Set(new.image_url),
      tags: Set(new.tags),
    };

    Ok(skill.insert(self.db).await?)
  }

  pub async fn by_id(&self, skill_id: Uuid) -> Result<Option<skill::Model>> {
    Ok(skill::Entity::find_by_id(skill_id).one(self.db).await?)
  }

  pub async fn all(&self) -> Result<Vec<skill::Model>> {
    let skills =
      skill::Entity::find().order_by_asc(skill::Column::Name).all(self.db).await?;
    Ok(skills)
  }

  pub async fn progress(
    &self,
    user_id: Uuid,
    skill_id: Uuid,
  ) -> Result<Option<user_skill::Model>> {
    let progress =
      user_skill::Entity::find_by_id((user_id, skill_id)).one(self.db).await?;
    Ok(progress)
  }

  /// Counts one more verified pass and recomputes the level.
  ///
  /// This is a read followed by an upsert, not an atomic increment: callers
  /// must hold the user's [`crate::gate::Gate`] permit.
  pub async fn record_pass(
    &self,
    user_id: Uuid,
    skill_id: Uuid,
  ) -> Result<user_skill::Model> {
    let now = Utc::now().naive_utc();
    let current = self.progress(user_id, skill_id).await?;

    let passed_count = current.as_ref().map_or(0, |p| p.passed_count) + 1;
    let level = progress::level_of(passed_count);
    let acquired_at = current.map_or(now, |p| p.acquired_at);

    let model = user_skill::ActiveModel {
      user_id: Set(user_id),
      skill_id: Set(skill_id),
      passed_count: Set(passed_count),
      level: Set(level),
      acquired_at: Set(acquired_at),
      updated_at: Set(now),
    };

    user_skill::Entity::insert(model)
      .on_conflict(
        OnConflict::columns([user_skill::Column::UserId, user_skill::Column::SkillId])
          .update_columns([
            user_skill::Column::PassedCount,
            user_skill::Column::Level,
            user_skill::Column::UpdatedAt,
          ])
          .to_owned(),
      )
      .exec_without_returning(self.db)
      .await?;

    Ok(user_skill::Model {
      user_id,
      skill_id,
      passed_count,
      level,
      acquired_at,
      updated_at: now,
    })
  }

  /// Levels of every skill the user has progress on.
  pub async fn levels(&self, user_id: Uuid) -> Result<Vec<i32>> {
    let levels: Vec<i32> = user_skill::Entity::find()
      .select_only()
      .column(user_skill::Column::Level)
      .filter(user_skill::Column::UserId.eq(user_id))
      .into_tuple()
      .all(self.db)
      .await?;
    Ok(levels)
  }
}
