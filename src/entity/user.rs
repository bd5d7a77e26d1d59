use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
  Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[sea_orm(string_value = "user")]
  User,
  #[sea_orm(string_value = "evaluator")]
  Evaluator,
  #[sea_orm(string_value = "admin")]
  Admin,
}

impl Default for Role {
  fn default() -> Self {
    Self::User
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  /// Subject id issued by the identity provider
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_id: Uuid,
  pub nickname: Option<String>,
  pub avatar_url: Option<String>,
  pub role: Role,
  /// Overall standing, `1..=10`, recomputed from `user_skills`
  pub rank: i32,
  pub level_diagnosed: bool,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::user_skill::Entity")]
  UserSkills,
  #[sea_orm(has_many = "super::submission::Entity")]
  Submissions,
}

impl Related<super::user_skill::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::UserSkills.def()
  }
}

impl Related<super::submission::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Submissions.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
