//! Overall verdict on a submission, with advice for the learner

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub evaluation_id: Uuid,
  pub submission_id: Uuid,
  pub evaluator_id: Uuid,
  pub is_passed: bool,
  pub advice: Option<String>,
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
}

impl Related<super::submission::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Submission.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
