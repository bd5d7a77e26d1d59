use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Users::Table)
          .if_not_exists()
          .col(ColumnDef::new(Users::UserId).uuid().not_null().primary_key())
          .col(ColumnDef::new(Users::Nickname).string().null())
          .col(ColumnDef::new(Users::AvatarUrl).string().null())
          .col(ColumnDef::new(Users::Role).string().not_null().default("user"))
          .col(ColumnDef::new(Users::Rank).integer().not_null().default(1))
          .col(
            ColumnDef::new(Users::LevelDiagnosed)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Users {
  Table,
  UserId,
  Nickname,
  AvatarUrl,
  Role,
  Rank,
  LevelDiagnosed,
  CreatedAt,
  UpdatedAt,
}
