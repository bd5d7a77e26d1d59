//! Per (user, skill) pass counter and the level derived from it

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_skills")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_id: Uuid,
  #[sea_orm(primary_key, auto_increment = false)]
  pub skill_id: Uuid,
  pub passed_count: i32,
  /// always `progress::level_of(passed_count)`
  pub level: i32,
  /// first pass, never rewritten
  pub acquired_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::user::Entity",
    from = "Column::UserId",
    to = "super::user::Column::UserId"
  )]
  User,
  #[sea_orm(
    belongs_to = "super::skill::Entity",
    from = "Column::SkillId",
    to = "super::skill::Column::SkillId"
  )]
  Skill,
}

impl Related<super::user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl Related<super::skill::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Skill.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
