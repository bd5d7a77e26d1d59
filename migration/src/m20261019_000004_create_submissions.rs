use sea_orm_migration::prelude::*;

use super::{
  m20261019_000001_create_users::Users,
  m20261019_000003_create_recipes::{RecipeSteps, Recipes},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Submissions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Submissions::SubmissionId).uuid().not_null().primary_key(),
          )
          .col(ColumnDef::new(Submissions::UserId).uuid().not_null())
          .col(ColumnDef::new(Submissions::RecipeId).uuid().not_null())
          .col(
            ColumnDef::new(Submissions::Status)
              .string()
              .not_null()
              .default("in_progress"),
          )
          .col(ColumnDef::new(Submissions::Feedback).text().null())
          .col(ColumnDef::new(Submissions::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Submissions::SubmittedAt).date_time().null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_submissions_user")
              .from(Submissions::Table, Submissions::UserId)
              .to(Users::Table, Users::UserId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_submissions_recipe")
              .from(Submissions::Table, Submissions::RecipeId)
              .to(Recipes::Table, Recipes::RecipeId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_submissions_user")
          .table(Submissions::Table)
          .col(Submissions::UserId)
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(SubmissionStepImages::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(SubmissionStepImages::ImageId)
              .uuid()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(SubmissionStepImages::SubmissionId).uuid().not_null())
          .col(ColumnDef::new(SubmissionStepImages::StepId).uuid().not_null())
          .col(ColumnDef::new(SubmissionStepImages::ImageUrl).string().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_submission_step_images_submission")
              .from(SubmissionStepImages::Table, SubmissionStepImages::SubmissionId)
              .to(Submissions::Table, Submissions::SubmissionId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_submission_step_images_step")
              .from(SubmissionStepImages::Table, SubmissionStepImages::StepId)
              .to(RecipeSteps::Table, RecipeSteps::StepId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(StepPhotos::Table)
          .if_not_exists()
          .col(ColumnDef::new(StepPhotos::PhotoId).uuid().not_null().primary_key())
          .col(ColumnDef::new(StepPhotos::UserId).uuid().not_null())
          .col(ColumnDef::new(StepPhotos::RecipeId).uuid().null())
          .col(ColumnDef::new(StepPhotos::StepId).uuid().not_null())
          .col(ColumnDef::new(StepPhotos::ImageUrl).string().not_null())
          .col(ColumnDef::new(StepPhotos::UploadedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_step_photos_user")
              .from(StepPhotos::Table, StepPhotos::UserId)
              .to(Users::Table, Users::UserId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(StepPhotos::Table).to_owned()).await?;
    manager
      .drop_table(Table::drop().table(SubmissionStepImages::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(Submissions::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Submissions {
  Table,
  SubmissionId,
  UserId,
  RecipeId,
  Status,
  Feedback,
  CreatedAt,
  SubmittedAt,
}

#[derive(DeriveIden)]
pub enum SubmissionStepImages {
  Table,
  ImageId,
  SubmissionId,
  StepId,
  ImageUrl,
}

#[derive(DeriveIden)]
pub enum StepPhotos {
  Table,
  PhotoId,
  UserId,
  RecipeId,
  StepId,
  ImageUrl,
  UploadedAt,
}
