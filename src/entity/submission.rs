//! Submission entity - one learner's attempt at a recipe

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
  Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
  #[sea_orm(string_value = "in_progress")]
  InProgress,
  #[sea_orm(string_value = "submitted")]
  Submitted,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub submission_id: Uuid,
  /// owner, fixed at creation
  pub user_id: Uuid,
  pub recipe_id: Uuid,
  pub status: SubmissionStatus,
  pub feedback: Option<String>,
  pub created_at: DateTime,
  /// set by the first completion only
  pub submitted_at: Option<DateTime>,
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
    belongs_to = "super::recipe::Entity",
    from = "Column::RecipeId",
    to = "super::recipe::Column::RecipeId"
  )]
  Recipe,
  #[sea_orm(has_many = "super::submission_step_image::Entity")]
  Images,
  #[sea_orm(has_many = "super::skill_evaluation::Entity")]
  SkillEvaluations,
}

impl Related<super::user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl Related<super::recipe::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Recipe.def()
  }
}

impl Related<super::submission_step_image::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Images.def()
  }
}

impl Related<super::skill_evaluation::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::SkillEvaluations.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
