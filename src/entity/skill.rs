use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skills")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub skill_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
  /// free-form tags, e.g. `{"category": "knife"}`
  pub tags: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::user_skill::Entity")]
  UserSkills,
  #[sea_orm(has_many = "super::recipe_skill::Entity")]
  RecipeSkills,
}

impl Related<super::user_skill::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::UserSkills.def()
  }
}

impl Related<super::recipe_skill::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::RecipeSkills.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
