use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission_step_images")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub image_id: Uuid,
  pub submission_id: Uuid,
  pub step_id: Uuid,
  pub image_url: String,
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
