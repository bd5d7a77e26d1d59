use sea_orm_migration::prelude::*;

use super::{
  m20261019_000002_create_skills::Skills,
  m20261019_000004_create_submissions::Submissions,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Evaluations::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Evaluations::EvaluationId).uuid().not_null().primary_key(),
          )
          .col(ColumnDef::new(Evaluations::SubmissionId).uuid().not_null())
          .col(ColumnDef::new(Evaluations::EvaluatorId).uuid().not_null())
          .col(ColumnDef::new(Evaluations::IsPassed).boolean().not_null())
          .col(ColumnDef::new(Evaluations::Advice).text().null())
          .col(ColumnDef::new(Evaluations::EvaluatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_evaluations_submission")
              .from(Evaluations::Table, Evaluations::SubmissionId)
              .to(Submissions::Table, Submissions::SubmissionId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(SkillEvaluations::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(SkillEvaluations::SkillEvaluationId)
              .uuid()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(SkillEvaluations::SubmissionId).uuid().not_null())
          .col(ColumnDef::new(SkillEvaluations::SkillId).uuid().not_null())
          .col(ColumnDef::new(SkillEvaluations::UserId).uuid().not_null())
          .col(ColumnDef::new(SkillEvaluations::EvaluatorId).uuid().not_null())
          .col(ColumnDef::new(SkillEvaluations::IsPassed).boolean().not_null())
          .col(ColumnDef::new(SkillEvaluations::EvaluatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_skill_evaluations_submission")
              .from(SkillEvaluations::Table, SkillEvaluations::SubmissionId)
              .to(Submissions::Table, Submissions::SubmissionId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_skill_evaluations_skill")
              .from(SkillEvaluations::Table, SkillEvaluations::SkillId)
              .to(Skills::Table, Skills::SkillId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_skill_evaluations_submission")
          .table(SkillEvaluations::Table)
          .col(SkillEvaluations::SubmissionId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(SkillEvaluations::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(Evaluations::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Evaluations {
  Table,
  EvaluationId,
  SubmissionId,
  EvaluatorId,
  IsPassed,
  Advice,
  EvaluatedAt,
}

#[derive(DeriveIden)]
pub enum SkillEvaluations {
  Table,
  SkillEvaluationId,
  SubmissionId,
  SkillId,
  UserId,
  EvaluatorId,
  IsPassed,
  EvaluatedAt,
}
