use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_steps")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub step_id: Uuid,
  pub recipe_id: Uuid,
  pub step_number: i32,
  pub title: Option<String>,
  pub instruction: String,
  /// skill practised by this step
  pub skill_id: Option<Uuid>,
  pub requires_photo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::recipe::Entity",
    from = "Column::RecipeId",
    to = "super::recipe::Column::RecipeId"
  )]
  Recipe,
  #[sea_orm(has_many = "super::recipe_step_image::Entity")]
  Images,
}

impl Related<super::recipe::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Recipe.def()
  }
}

impl Related<super::recipe_step_image::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Images.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
