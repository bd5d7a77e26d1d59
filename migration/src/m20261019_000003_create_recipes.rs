use sea_orm_migration::prelude::*;

use super::m20261019_000002_create_skills::Skills;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Recipes::Table)
          .if_not_exists()
          .col(ColumnDef::new(Recipes::RecipeId).uuid().not_null().primary_key())
          .col(ColumnDef::new(Recipes::Title).string().not_null())
          .col(ColumnDef::new(Recipes::Description).text().null())
          .col(ColumnDef::new(Recipes::Difficulty).integer().not_null().default(1))
          .col(ColumnDef::new(Recipes::FinishUrl).string().null())
          .col(ColumnDef::new(Recipes::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_recipes_difficulty")
          .table(Recipes::Table)
          .col(Recipes::Difficulty)
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(RecipeSkills::Table)
          .if_not_exists()
          .col(ColumnDef::new(RecipeSkills::RecipeId).uuid().not_null())
          .col(ColumnDef::new(RecipeSkills::SkillId).uuid().not_null())
          .primary_key(
            Index::create().col(RecipeSkills::RecipeId).col(RecipeSkills::SkillId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_recipe_skills_recipe")
              .from(RecipeSkills::Table, RecipeSkills::RecipeId)
              .to(Recipes::Table, Recipes::RecipeId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_recipe_skills_skill")
              .from(RecipeSkills::Table, RecipeSkills::SkillId)
              .to(Skills::Table, Skills::SkillId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(RecipeIngredients::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(RecipeIngredients::IngredientId)
              .uuid()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(RecipeIngredients::RecipeId).uuid().not_null())
          .col(ColumnDef::new(RecipeIngredients::Name).string().not_null())
          .col(ColumnDef::new(RecipeIngredients::Quantity).string().null())
          .col(ColumnDef::new(RecipeIngredients::Unit).string().null())
          .col(ColumnDef::new(RecipeIngredients::OrderIndex).integer().null())
          .col(ColumnDef::new(RecipeIngredients::Note).text().null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_recipe_ingredients_recipe")
              .from(RecipeIngredients::Table, RecipeIngredients::RecipeId)
              .to(Recipes::Table, Recipes::RecipeId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(RecipeSteps::Table)
          .if_not_exists()
          .col(ColumnDef::new(RecipeSteps::StepId).uuid().not_null().primary_key())
          .col(ColumnDef::new(RecipeSteps::RecipeId).uuid().not_null())
          .col(ColumnDef::new(RecipeSteps::StepNumber).integer().not_null())
          .col(ColumnDef::new(RecipeSteps::Title).string().null())
          .col(ColumnDef::new(RecipeSteps::Instruction).text().not_null())
          .col(ColumnDef::new(RecipeSteps::SkillId).uuid().null())
          .col(
            ColumnDef::new(RecipeSteps::RequiresPhoto)
              .boolean()
              .not_null()
              .default(false),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_recipe_steps_recipe")
              .from(RecipeSteps::Table, RecipeSteps::RecipeId)
              .to(Recipes::Table, Recipes::RecipeId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_recipe_steps_skill")
              .from(RecipeSteps::Table, RecipeSteps::SkillId)
              .to(Skills::Table, Skills::SkillId)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(RecipeStepImages::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(RecipeStepImages::ImageId).uuid().not_null().primary_key(),
          )
          .col(ColumnDef::new(RecipeStepImages::StepId).uuid().not_null())
          .col(ColumnDef::new(RecipeStepImages::ImageUrl).string().not_null())
          .col(ColumnDef::new(RecipeStepImages::OrderIndex).integer().null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_recipe_step_images_step")
              .from(RecipeStepImages::Table, RecipeStepImages::StepId)
              .to(RecipeSteps::Table, RecipeSteps::StepId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(RecipeStepImages::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(RecipeSteps::Table).to_owned()).await?;
    manager
      .drop_table(Table::drop().table(RecipeIngredients::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(RecipeSkills::Table).to_owned()).await?;
    manager.drop_table(Table::drop().table(Recipes::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Recipes {
  Table,
  RecipeId,
  Title,
  Description,
  Difficulty,
  FinishUrl,
  CreatedAt,
}

#[derive(DeriveIden)]
pub enum RecipeSkills {
  Table,
  RecipeId,
  SkillId,
}

#[derive(DeriveIden)]
pub enum RecipeIngredients {
  Table,
  IngredientId,
  RecipeId,
  Name,
  Quantity,
  Unit,
  OrderIndex,
  Note,
}

#[derive(DeriveIden)]
pub enum RecipeSteps {
  Table,
  StepId,
  RecipeId,
  StepNumber,
  Title,
  Instruction,
  SkillId,
  RequiresPhoto,
}

#[derive(DeriveIden)]
pub enum RecipeStepImages {
  Table,
  ImageId,
  StepId,
  ImageUrl,
  OrderIndex,
}
