use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_skills")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub recipe_id: Uuid,
  #[sea_orm(primary_key, auto_increment = false)]
  pub skill_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::recipe::Entity",
    from = "Column::RecipeId",
    to = "super::recipe::Column::RecipeId"
  )]
  Recipe,
  #[sea_orm(
    belongs_to = "super::skill::Entity",
    from = "Column::SkillId",
    to = "super::skill::Column::SkillId"
  )]
  Skill,
}

impl Related<super::recipe::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Recipe.def()
  }
}

impl Related<super::skill::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Skill.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
