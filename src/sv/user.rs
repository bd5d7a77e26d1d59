use serde::{Deserialize, Serialize};

use crate::{
  auth::Permission,
  entity::{Role, skill, user, user_skill},
  prelude::*,
};

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
  pub nickname: Option<String>,
  #[serde(alias = "avatarUrl")]
  pub avatar_url: Option<String>,
}

/// Skill progress row joined with the skill it belongs to
#[derive(Debug, Serialize)]
pub struct SkillProgress {
  pub skill_id: Uuid,
  pub name: Option<String>,
  pub passed_count: i32,
  pub level: i32,
  pub acquired_at: DateTime,
}

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Creates the profile of a freshly signed-up identity; returns the
  /// existing one when called twice.
  pub async fn register(
    &self,
    user_id: Uuid,
    profile: ProfileUpdate,
  ) -> Result<user::Model> {
    if let Some(user) = self.by_id(user_id).await? {
      return Ok(user);
    }

    let now = Utc::now().naive_utc();
    let user = user::ActiveModel {
      user_id: Set(user_id),
      nickname: Set(profile.nickname),
      avatar_url: Set(profile.avatar_url),
      role: Set(Role::User),
      rank: Set(crate::progress::MIN_RANK),
      level_diagnosed: Set(false),
      created_at: Set(now),
      updated_at: Set(now),
    };

    info!("Registered profile for {user_id}");
    Ok(user.insert(self.db).await?)
  }

  pub async fn by_id(&self, user_id: Uuid) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(user_id).one(self.db).await?)
  }

  pub async fn get(&self, user_id: Uuid) -> Result<user::Model> {
    self.by_id(user_id).await?.ok_or(Error::NotFound(Missing::User))
  }

  /// Loads the caller and checks its role grants `permission`.
  pub async fn authorize(
    &self,
    user_id: Uuid,
    permission: Permission,
  ) -> Result<user::Model> {
    let user = self.get(user_id).await?;
    if !user.role.allows(permission) {
      warn!("{user_id} ({:?}) denied {permission:?}", user.role);
      return Err(Error::Forbidden("Insufficient role"));
    }
    Ok(user)
  }

  pub async fn update_profile(
    &self,
    user_id: Uuid,
    update: ProfileUpdate,
  ) -> Result<user::Model> {
    let user = self.get(user_id).await?;

    let mut model: user::ActiveModel = user.into();
    if let Some(nickname) = update.nickname {
      model.nickname = Set(Some(nickname));
    }
    if let Some(avatar_url) = update.avatar_url {
      model.avatar_url = Set(Some(avatar_url));
    }
    model.updated_at = Set(Utc::now().naive_utc());

    Ok(model.update(self.db).await?)
  }

  /// Overwrites the stored rank.
  pub async fn set_rank(&self, user_id: Uuid, rank: i32) -> Result<()> {
    use sea_orm::sea_query::Expr;

    let res = user::Entity::update_many()
      .col_expr(user::Column::Rank, Expr::value(rank))
      .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
      .filter(user::Column::UserId.eq(user_id))
      .exec(self.db)
      .await?;

    if res.rows_affected == 0 {
      return Err(Error::NotFound(Missing::User));
    }
    Ok(())
  }

  pub async fn skills(&self, user_id: Uuid) -> Result<Vec<SkillProgress>> {
    let rows = user_skill::Entity::find()
      .filter(user_skill::Column::UserId.eq(user_id))
      .find_also_related(skill::Entity)
      .order_by_desc(user_skill::Column::Level)
      .order_by_asc(user_skill::Column::AcquiredAt)
      .all(self.db)
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(progress, skill)| SkillProgress {
          skill_id: progress.skill_id,
          name: skill.map(|s| s.name),
          passed_count: progress.passed_count,
          level: progress.level,
          acquired_at: progress.acquired_at,
        })
        .collect(),
    )
  }
}
