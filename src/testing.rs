//! Shared fixtures for service and handler tests

use sea_orm::{ConnectionTrait, DbBackend, Schema};

use crate::{entity::*, prelude::*};

async fn create<E: EntityTrait>(db: &DatabaseConnection, schema: &Schema, entity: E) {
  let stmt = schema.create_table_from_entity(entity);
  db.execute(db.get_database_backend().build(&stmt)).await.unwrap();
}

pub async fn setup_db() -> DatabaseConnection {
  let db = Database::connect("sqlite::memory:").await.unwrap();
  let schema = Schema::new(DbBackend::Sqlite);

  create(&db, &schema, user::Entity).await;
  create(&db, &schema, skill::Entity).await;
  create(&db, &schema, recipe::Entity).await;
  create(&db, &schema, recipe_skill::Entity).await;
  create(&db, &schema, recipe_ingredient::Entity).await;
  create(&db, &schema, recipe_step::Entity).await;
  create(&db, &schema, recipe_step_image::Entity).await;
  create(&db, &schema, submission::Entity).await;
  create(&db, &schema, submission_step_image::Entity).await;
  create(&db, &schema, step_photo::Entity).await;
  create(&db, &schema, evaluation::Entity).await;
  create(&db, &schema, skill_evaluation::Entity).await;
  create(&db, &schema, user_skill::Entity).await;

  db
}

pub async fn user(db: &DatabaseConnection, role: Role) -> user::Model {
  let now = Utc::now().naive_utc();
  user::ActiveModel {
    user_id: Set(Uuid::new_v4()),
    nickname: Set(None),
    avatar_url: Set(None),
    role: Set(role),
    rank: Set(1),
    level_diagnosed: Set(false),
    created_at: Set(now),
    updated_at: Set(now),
  }
  .insert(db)
  .await
  .unwrap()
}

pub async fn skill(db: &DatabaseConnection, name: &str) -> skill::Model {
  skill::ActiveModel {
    skill_id: Set(Uuid::new_v4()),
    name: Set(name.to_string()),
    description: Set(None),
    image_url: Set(None),
    tags: Set(None),
  }
  .insert(db)
  .await
  .unwrap()
}

pub async fn recipe(db: &DatabaseConnection, difficulty: i32) -> recipe::Model {
  recipe::ActiveModel {
    recipe_id: Set(Uuid::new_v4()),
    title: Set(format!("Dish #{difficulty}")),
    description: Set(None),
    difficulty: Set(difficulty),
    finish_url: Set(Some("https://img.example/dish.jpg".into())),
    created_at: Set(Utc::now().naive_utc()),
  }
  .insert(db)
  .await
  .unwrap()
}

pub async fn step(db: &DatabaseConnection, recipe: Uuid, number: i32) -> recipe_step::Model {
  recipe_step::ActiveModel {
    step_id: Set(Uuid::new_v4()),
    recipe_id: Set(recipe),
    step_number: Set(number),
    title: Set(None),
    instruction: Set(format!("Step {number}")),
    skill_id: Set(None),
    requires_photo: Set(true),
  }
  .insert(db)
  .await
  .unwrap()
}

pub async fn submission(
  db: &DatabaseConnection,
  owner: Uuid,
  recipe: Uuid,
) -> submission::Model {
  submission::ActiveModel {
    submission_id: Set(Uuid::new_v4()),
    user_id: Set(owner),
    recipe_id: Set(recipe),
    status: Set(SubmissionStatus::Submitted),
    feedback: Set(None),
    created_at: Set(Utc::now().naive_utc()),
    submitted_at: Set(Some(Utc::now().naive_utc())),
  }
  .insert(db)
  .await
  .unwrap()
}

/// Stores a raw verdict, bypassing permission checks.
pub async fn verdict(
  db: &DatabaseConnection,
  submission: Uuid,
  learner: Uuid,
  skill: Uuid,
  is_passed: bool,
) -> skill_evaluation::Model {
  skill_evaluation::ActiveModel {
    skill_evaluation_id: Set(Uuid::new_v4()),
    submission_id: Set(submission),
    skill_id: Set(skill),
    user_id: Set(learner),
    evaluator_id: Set(Uuid::new_v4()),
    is_passed: Set(is_passed),
    evaluated_at: Set(Utc::now().naive_utc()),
  }
  .insert(db)
  .await
  .unwrap()
}

pub async fn progress(
  db: &DatabaseConnection,
  user: Uuid,
  skill: Uuid,
  passed_count: i32,
) -> user_skill::Model {
  let at = Utc::now().naive_utc() - chrono::TimeDelta::days(30);
  user_skill::ActiveModel {
    user_id: Set(user),
    skill_id: Set(skill),
    passed_count: Set(passed_count),
    level: Set(crate::progress::level_of(passed_count)),
    acquired_at: Set(at),
    updated_at: Set(at),
  }
  .insert(db)
  .await
  .unwrap()
}
