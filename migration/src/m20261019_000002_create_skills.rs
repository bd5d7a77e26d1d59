use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Skills::Table)
          .if_not_exists()
          .col(ColumnDef::new(Skills::SkillId).uuid().not_null().primary_key())
          .col(ColumnDef::new(Skills::Name).string().not_null().unique_key())
          .col(ColumnDef::new(Skills::Description).text().null())
          .col(ColumnDef::new(Skills::ImageUrl).string().null())
          .col(ColumnDef::new(Skills::Tags).json_binary().null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Skills::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Skills {
  Table,
  SkillId,
  Name,
  Description,
  ImageUrl,
  Tags,
}
