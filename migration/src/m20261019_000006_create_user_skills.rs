use sea_orm_migration::prelude::*;

use super::{
  m20261019_000001_create_users::Users, m20261019_000002_create_skills::Skills,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(UserSkills::Table)
          .if_not_exists()
          .col(ColumnDef::new(UserSkills::UserId).uuid().not_null())
          .col(ColumnDef::new(UserSkills::SkillId).uuid().not_null())
          .col(
            ColumnDef::new(UserSkills::PassedCount).integer().not_null().default(0),
          )
          .col(ColumnDef::new(UserSkills::Level).integer().not_null().default(0))
          .col(ColumnDef::new(UserSkills::AcquiredAt).date_time().not_null())
          .col(ColumnDef::new(UserSkills::UpdatedAt).date_time().not_null())
          .primary_key(Index::create().col(UserSkills::UserId).col(UserSkills::SkillId))
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_skills_user")
              .from(UserSkills::Table, UserSkills::UserId)
              .to(Users::Table, Users::UserId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_skills_skill")
              .from(UserSkills::Table, UserSkills::SkillId)
              .to(Skills::Table, Skills::SkillId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(UserSkills::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum UserSkills {
  Table,
  UserId,
  SkillId,
  PassedCount,
  Level,
  AcquiredAt,
  UpdatedAt,
}
