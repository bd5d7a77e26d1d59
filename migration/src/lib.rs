pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_users;
mod m20261019_000002_create_skills;
mod m20261019_000003_create_recipes;
mod m20261019_000004_create_submissions;
mod m20261019_000005_create_evaluations;
mod m20261019_000006_create_user_skills;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20261019_000001_create_users::Migration),
      Box::new(m20261019_000002_create_skills::Migration),
      Box::new(m20261019_000003_create_recipes::Migration),
      Box::new(m20261019_000004_create_submissions::Migration),
      Box::new(m20261019_000005_create_evaluations::Migration),
      Box::new(m20261019_000006_create_user_skills::Migration),
    ]
  }
}
