use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_ingredients")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub ingredient_id: Uuid,
  pub recipe_id: Uuid,
  pub name: String,
  pub quantity: Option<String>,
  pub unit: Option<String>,
  pub order_index: Option<i32>,
  pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::recipe::Entity",
    from = "Column::RecipeId",
    to = "super::recipe::Column::RecipeId"
  )]
  Recipe,
}

impl Related<super::recipe::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Recipe.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
