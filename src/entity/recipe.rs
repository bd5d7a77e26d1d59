use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub recipe_id: Uuid,
  pub title: String,
  pub description: Option<String>,
  /// matched against the user rank for recommendations
  pub difficulty: i32,
  /// picture of the finished dish
  pub finish_url: Option<String>,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::recipe_skill::Entity")]
  RecipeSkills,
  #[sea_orm(has_many = "super::recipe_ingredient::Entity")]
  Ingredients,
  #[sea_orm(has_many = "super::recipe_step::Entity")]
  Steps,
}

impl Related<super::recipe_skill::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::RecipeSkills.def()
  }
}

impl Related<super::recipe_ingredient::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Ingredients.def()
  }
}

impl Related<super::recipe_step::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Steps.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
