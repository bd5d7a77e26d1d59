//! Pass/fail verdict on one skill within one submission

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skill_evaluations")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub skill_evaluation_id: Uuid,
  pub submission_id: Uuid,
  pub skill_id: Uuid,
  /// learner being judged (the submission owner)
  pub user_id: Uuid,
  pub evaluator_id: Uuid,
  pub is_passed: bool,
  pub evaluated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::submission::Entity",
    from = "Column::SubmissionId",
    to = "super::submission::Column::SubmissionId"
  )]
  Submission,
  #[sea_orm(
    belongs_to = "super::skill::Entity",
    from = "Column::SkillId",
    to = "super::skill::Column::SkillId"
  )]
  Skill,
}

impl Related<super::submission::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Submission.def()
  }
}

impl Related<super::skill::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Skill.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
