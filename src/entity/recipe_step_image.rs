use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_step_images")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub image_id: Uuid,
  pub step_id: Uuid,
  pub image_url: String,
  pub order_index: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::recipe_step::Entity",
    from = "Column::StepId",
    to = "super::recipe_step::Column::StepId"
  )]
  Step,
}

impl Related<super::recipe_step::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Step.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
