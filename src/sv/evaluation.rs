//! Evaluator verdicts and the submission evaluation pipeline
//!
//! `process_id` turns the passed skill verdicts of one submission into skill
//! progress and a recomputed rank:
//!
//! ```text
//! Received -> EvaluationsLoaded -> PassedFiltered -> SkillsUpdated
//!          -> LevelsReloaded -> RankComputed -> Persisted
//! ```
//!
//! Any store failure aborts the run and names the step it happened in.
//! Progress written before the failure is kept.

use serde::{Deserialize, Serialize};

use crate::{
  auth::Permission,
  entity::{evaluation, skill_evaluation, submission},
  gate::Gate,
  prelude::*,
  progress, sv,
};

#[derive(Debug, Clone, Copy)]
enum Stage {
  Received,
  EvaluationsLoaded,
  PassedFiltered,
  SkillsUpdated,
  LevelsReloaded,
  RankComputed,
  Persisted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
  Ranked {
    #[serde(rename = "userId")]
    user_id: Uuid,
    #[serde(rename = "newRank")]
    new_rank: i32,
  },
  NoPassedSkills {
    message: &'static str,
  },
}

impl Outcome {
  fn no_passed_skills() -> Self {
    Outcome::NoPassedSkills { message: "no passed skills" }
  }
}

#[derive(Debug, Deserialize)]
pub struct NewEvaluation {
  #[serde(alias = "submissionId")]
  pub submission_id: Uuid,
  #[serde(alias = "isPassed")]
  pub is_passed: bool,
  pub advice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewSkillEvaluation {
  #[serde(alias = "submissionId")]
  pub submission_id: Uuid,
  #[serde(alias = "skillId")]
  pub skill_id: Uuid,
  #[serde(alias = "isPassed")]
  pub is_passed: bool,
}

/// Validates a raw submission id before anything touches the store.
pub fn parse_submission_id(raw: Option<&str>) -> Result<Uuid> {
  let raw = raw.map(str::trim).unwrap_or_default();
  if raw.is_empty() {
    return Err(Error::bad_request("submissionId is required"));
  }
  Uuid::parse_str(raw)
    .map_err(|_| Error::bad_request(format!("submissionId `{raw}` is malformed")))
}

/// The single learner all verdicts of a batch belong to.
fn learner_of(
  submission_id: Uuid,
  verdicts: &[skill_evaluation::Model],
) -> Result<Uuid> {
  let Some(first) = verdicts.first() else {
    return Err(Error::NotFound(Missing::Evaluations));
  };
  if verdicts.iter().any(|v| v.user_id != first.user_id) {
    return Err(Error::bad_request(format!(
      "Skill evaluations of submission {submission_id} belong to more than one user"
    )));
  }
  Ok(first.user_id)
}

/// Skills with at least one passed verdict, each once, in verdict order.
fn passed_skills(verdicts: &[skill_evaluation::Model]) -> Vec<Uuid> {
  let mut skills = Vec::new();
  for verdict in verdicts.iter().filter(|v| v.is_passed) {
    if !skills.contains(&verdict.skill_id) {
      skills.push(verdict.skill_id);
    }
  }
  skills
}

pub struct Evaluation<'a> {
  db: &'a DatabaseConnection,
  gate: &'a Gate,
}

impl<'a> Evaluation<'a> {
  pub fn new(db: &'a DatabaseConnection, gate: &'a Gate) -> Self {
    Self { db, gate }
  }

  async fn submission(&self, submission_id: Uuid) -> Result<submission::Model> {
    submission::Entity::find_by_id(submission_id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound(Missing::Submission))
  }

  pub async fn create_submission_evaluation(
    &self,
    evaluator: Uuid,
    new: NewEvaluation,
  ) -> Result<evaluation::Model> {
    sv::User::new(self.db).authorize(evaluator, Permission::Evaluate).await?;
    let submission = self.submission(new.submission_id).await?;

    let evaluation = evaluation::ActiveModel {
      evaluation_id: Set(Uuid::new_v4()),
      submission_id: Set(submission.submission_id),
      evaluator_id: Set(evaluator),
      is_passed: Set(new.is_passed),
      advice: Set(new.advice),
      evaluated_at: Set(Utc::now().naive_utc()),
    };

    Ok(evaluation.insert(self.db).await?)
  }

  /// Records a verdict on one skill. The learner is always the owner of the
  /// submission, never taken from the request.
  pub async fn create_skill_evaluation(
    &self,
    evaluator: Uuid,
    new: NewSkillEvaluation,
  ) -> Result<skill_evaluation::Model> {
    sv::User::new(self.db).authorize(evaluator, Permission::Evaluate).await?;
    let submission = self.submission(new.submission_id).await?;
    sv::Skill::new(self.db)
      .by_id(new.skill_id)
      .await?
      .ok_or(Error::NotFound(Missing::Skill))?;

    let verdict = skill_evaluation::ActiveModel {
      skill_evaluation_id: Set(Uuid::new_v4()),
      submission_id: Set(submission.submission_id),
      skill_id: Set(new.skill_id),
      user_id: Set(submission.user_id),
      evaluator_id: Set(evaluator),
      is_passed: Set(new.is_passed),
      evaluated_at: Set(Utc::now().naive_utc()),
    };

    Ok(verdict.insert(self.db).await?)
  }

  pub async fn verdicts(
    &self,
    submission_id: Uuid,
  ) -> Result<Vec<skill_evaluation::Model>> {
    let verdicts = skill_evaluation::Entity::find()
      .filter(skill_evaluation::Column::SubmissionId.eq(submission_id))
      .order_by_asc(skill_evaluation::Column::EvaluatedAt)
      .all(self.db)
      .await?;
    Ok(verdicts)
  }

  /// Entry point for callers: the id is validated before the caller's role
  /// is looked up or anything else is read.
  pub async fn process(&self, caller: Uuid, raw: Option<&str>) -> Result<Outcome> {
    let submission_id = parse_submission_id(raw)?;
    sv::User::new(self.db).authorize(caller, Permission::Evaluate).await?;
    self.process_id(submission_id).await
  }

  pub async fn process_id(&self, submission_id: Uuid) -> Result<Outcome> {
    let stage = |stage: Stage| debug!("Submission {submission_id}: {stage:?}");
    stage(Stage::Received);

    let verdicts = self
      .verdicts(submission_id)
      .await
      .map_err(|err| err.during(Step::LoadEvaluations))?;
    if verdicts.is_empty() {
      return Err(Error::NotFound(Missing::Evaluations));
    }
    stage(Stage::EvaluationsLoaded);

    let user_id = learner_of(submission_id, &verdicts)?;
    let passed = passed_skills(&verdicts);
    stage(Stage::PassedFiltered);

    if passed.is_empty() {
      info!("Submission {submission_id} has no passed skills");
      return Ok(Outcome::no_passed_skills());
    }

    let _permit = self.gate.acquire(user_id).await;
    let skills = sv::Skill::new(self.db);

    for &skill_id in &passed {
      let row = skills
        .record_pass(user_id, skill_id)
        .await
        .map_err(|err| err.during(Step::UpdateSkill(skill_id)))?;
      debug!(
        "{user_id}: skill {skill_id} at {} passes, level {}",
        row.passed_count, row.level
      );
    }
    stage(Stage::SkillsUpdated);

    let levels = skills
      .levels(user_id)
      .await
      .map_err(|err| err.during(Step::ReloadLevels))?;
    stage(Stage::LevelsReloaded);

    let counts = progress::count_levels(levels);
    let new_rank = counts.rank();
    debug!("{user_id}: {counts:?} -> rank {new_rank}");
    stage(Stage::RankComputed);

    sv::User::new(self.db)
      .set_rank(user_id, new_rank)
      .await
      .map_err(|err| err.during(Step::PersistRank))?;
    stage(Stage::Persisted);

    info!("Submission {submission_id}: {user_id} is now rank {new_rank}");
    Ok(Outcome::Ranked { user_id, new_rank })
  }
}

#[cfg(test)]
mod tests {
  use sea_orm::{ConnectionTrait, PaginatorTrait};

  use super::*;
  use crate::{
    entity::{Role, user_skill},
    testing,
  };

  async fn counter(db: &DatabaseConnection, user: Uuid, skill: Uuid) -> (i32, i32) {
    let row = user_skill::Entity::find_by_id((user, skill)).one(db).await.unwrap().unwrap();
    (row.passed_count, row.level)
  }

  #[tokio::test]
  async fn test_processing_updates_progress_and_rank() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let learner = testing::user(&db, Role::User).await;
    let recipe = testing::recipe(&db, 1).await;
    let a = testing::skill(&db, "a").await;
    let b = testing::skill(&db, "b").await;

    testing::progress(&db, learner.user_id, b.skill_id, 4).await;
    for name in ["c", "d", "e"] {
      let skill = testing::skill(&db, name).await;
      testing::progress(&db, learner.user_id, skill.skill_id, 1).await;
    }

    let sub = testing::submission(&db, learner.user_id, recipe.recipe_id).await;
    testing::verdict(&db, sub.submission_id, learner.user_id, a.skill_id, true).await;
    testing::verdict(&db, sub.submission_id, learner.user_id, b.skill_id, true).await;

    let outcome =
      Evaluation::new(&db, &gate).process_id(sub.submission_id).await.unwrap();

    assert_eq!(outcome, Outcome::Ranked { user_id: learner.user_id, new_rank: 2 });
    assert_eq!(counter(&db, learner.user_id, a.skill_id).await, (1, 1));
    assert_eq!(counter(&db, learner.user_id, b.skill_id).await, (5, 3));
    assert_eq!(sv::User::new(&db).get(learner.user_id).await.unwrap().rank, 2);
  }

  #[tokio::test]
  async fn test_no_passed_verdicts_writes_nothing() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let learner = testing::user(&db, Role::User).await;
    let recipe = testing::recipe(&db, 1).await;
    let a = testing::skill(&db, "a").await;

    let sub = testing::submission(&db, learner.user_id, recipe.recipe_id).await;
    testing::verdict(&db, sub.submission_id, learner.user_id, a.skill_id, false).await;

    let outcome =
      Evaluation::new(&db, &gate).process_id(sub.submission_id).await.unwrap();

    assert_eq!(outcome, Outcome::NoPassedSkills { message: "no passed skills" });
    assert_eq!(user_skill::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(sv::User::new(&db).get(learner.user_id).await.unwrap(), learner);
  }

  #[tokio::test]
  async fn test_bad_input_fails_before_any_read() {
    // no tables: any store call would surface as a database error
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let gate = Gate::new();
    let sv = Evaluation::new(&db, &gate);

    for raw in [None, Some(""), Some("   "), Some("not-a-uuid")] {
      let res = sv.process(Uuid::new_v4(), raw).await;
      assert!(matches!(res, Err(Error::BadRequest(_))), "{raw:?}");
    }
  }

  #[tokio::test]
  async fn test_unknown_submission_is_not_found() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let admin = testing::user(&db, Role::Admin).await;

    let res = Evaluation::new(&db, &gate)
      .process(admin.user_id, Some(&Uuid::new_v4().to_string()))
      .await;
    assert!(matches!(res, Err(Error::NotFound(Missing::Evaluations))));
  }

  #[tokio::test]
  async fn test_mixed_user_batch_is_rejected() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let learner = testing::user(&db, Role::User).await;
    let stranger = testing::user(&db, Role::User).await;
    let recipe = testing::recipe(&db, 1).await;
    let a = testing::skill(&db, "a").await;

    let sub = testing::submission(&db, learner.user_id, recipe.recipe_id).await;
    testing::verdict(&db, sub.submission_id, learner.user_id, a.skill_id, true).await;
    testing::verdict(&db, sub.submission_id, stranger.user_id, a.skill_id, true).await;

    let res = Evaluation::new(&db, &gate).process_id(sub.submission_id).await;
    assert!(matches!(res, Err(Error::BadRequest(_))));
    assert_eq!(user_skill::Entity::find().count(&db).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn test_repeated_skill_counts_once_per_run() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let learner = testing::user(&db, Role::User).await;
    let recipe = testing::recipe(&db, 1).await;
    let a = testing::skill(&db, "a").await;

    let sub = testing::submission(&db, learner.user_id, recipe.recipe_id).await;
    for is_passed in [true, true, false] {
      testing::verdict(&db, sub.submission_id, learner.user_id, a.skill_id, is_passed)
        .await;
    }

    Evaluation::new(&db, &gate).process_id(sub.submission_id).await.unwrap();
    assert_eq!(counter(&db, learner.user_id, a.skill_id).await, (1, 1));
  }

  #[tokio::test]
  async fn test_failed_rank_write_keeps_progress() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let learner = testing::user(&db, Role::User).await;
    let recipe = testing::recipe(&db, 1).await;
    let a = testing::skill(&db, "a").await;

    let sub = testing::submission(&db, learner.user_id, recipe.recipe_id).await;
    testing::verdict(&db, sub.submission_id, learner.user_id, a.skill_id, true).await;

    db.execute_unprepared(
      "CREATE TRIGGER fail_rank BEFORE UPDATE ON users \
       BEGIN SELECT RAISE(ABORT, 'rank write refused'); END;",
    )
    .await
    .unwrap();

    let res = Evaluation::new(&db, &gate).process_id(sub.submission_id).await;

    match res {
      Err(Error::Persistence { step, .. }) => assert_eq!(step, Step::PersistRank),
      other => panic!("unexpected {other:?}"),
    }
    assert_eq!(counter(&db, learner.user_id, a.skill_id).await, (1, 1));
  }

  #[tokio::test]
  async fn test_failed_skill_update_names_skill_and_keeps_rank() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let learner = testing::user(&db, Role::User).await;
    let recipe = testing::recipe(&db, 1).await;
    let a = testing::skill(&db, "a").await;
    let b = testing::skill(&db, "b").await;
    sv::User::new(&db).set_rank(learner.user_id, 4).await.unwrap();

    let sub = testing::submission(&db, learner.user_id, recipe.recipe_id).await;
    testing::verdict(&db, sub.submission_id, learner.user_id, a.skill_id, true).await;
    testing::verdict(&db, sub.submission_id, learner.user_id, b.skill_id, true).await;

    // the first skill row goes in, the second one is refused
    db.execute_unprepared(
      "CREATE TRIGGER fail_second_skill BEFORE INSERT ON user_skills \
       WHEN (SELECT COUNT(*) FROM user_skills) >= 1 \
       BEGIN SELECT RAISE(ABORT, 'skill write refused'); END;",
    )
    .await
    .unwrap();

    let res = Evaluation::new(&db, &gate).process_id(sub.submission_id).await;

    let failed = match res {
      Err(Error::Persistence { step: Step::UpdateSkill(skill), .. }) => skill,
      other => panic!("unexpected {other:?}"),
    };
    let kept = if failed == a.skill_id { b.skill_id } else { a.skill_id };
    assert!(failed == a.skill_id || failed == b.skill_id);

    assert_eq!(counter(&db, learner.user_id, kept).await, (1, 1));
    let missing = user_skill::Entity::find_by_id((learner.user_id, failed)).one(&db).await;
    assert_eq!(missing.unwrap(), None);
    assert_eq!(sv::User::new(&db).get(learner.user_id).await.unwrap().rank, 4);
  }

  #[tokio::test]
  async fn test_concurrent_runs_for_one_user_lose_nothing() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let learner = testing::user(&db, Role::User).await;
    let recipe = testing::recipe(&db, 1).await;
    let a = testing::skill(&db, "a").await;

    let mut submissions = Vec::new();
    for _ in 0..6 {
      let sub = testing::submission(&db, learner.user_id, recipe.recipe_id).await;
      testing::verdict(&db, sub.submission_id, learner.user_id, a.skill_id, true).await;
      submissions.push(sub.submission_id);
    }

    let sv = Evaluation::new(&db, &gate);
    let runs = futures::future::join_all(submissions.iter().map(|&id| sv.process_id(id)));
    for outcome in runs.await {
      outcome.unwrap();
    }

    assert_eq!(counter(&db, learner.user_id, a.skill_id).await, (6, 3));
    assert_eq!(gate.sweep(), 1);
  }

  #[tokio::test]
  async fn test_skill_verdict_targets_submission_owner() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let learner = testing::user(&db, Role::User).await;
    let evaluator = testing::user(&db, Role::Evaluator).await;
    let recipe = testing::recipe(&db, 1).await;
    let a = testing::skill(&db, "a").await;
    let sub = testing::submission(&db, learner.user_id, recipe.recipe_id).await;
    let sv = Evaluation::new(&db, &gate);

    let new = || NewSkillEvaluation {
      submission_id: sub.submission_id,
      skill_id: a.skill_id,
      is_passed: true,
    };

    assert!(matches!(
      sv.create_skill_evaluation(learner.user_id, new()).await,
      Err(Error::Forbidden(_))
    ));

    let verdict = sv.create_skill_evaluation(evaluator.user_id, new()).await.unwrap();
    assert_eq!(verdict.user_id, learner.user_id);
    assert_eq!(verdict.evaluator_id, evaluator.user_id);

    let missing = NewSkillEvaluation { skill_id: Uuid::new_v4(), ..new() };
    assert!(matches!(
      sv.create_skill_evaluation(evaluator.user_id, missing).await,
      Err(Error::NotFound(Missing::Skill))
    ));
  }

  #[tokio::test]
  async fn test_submission_verdict_requires_submission() {
    let db = testing::setup_db().await;
    let gate = Gate::new();
    let admin = testing::user(&db, Role::Admin).await;
    let sv = Evaluation::new(&db, &gate);

    let res = sv
      .create_submission_evaluation(
        admin.user_id,
        NewEvaluation { submission_id: Uuid::new_v4(), is_passed: true, advice: None },
      )
      .await;
    assert!(matches!(res, Err(Error::NotFound(Missing::Submission))));
  }

  #[test]
  fn test_outcome_shape() {
    let user_id = Uuid::nil();
    let ranked = json::to_value(Outcome::Ranked { user_id, new_rank: 3 }).unwrap();
    assert_eq!(ranked, json::json!({ "userId": user_id, "newRank": 3 }));

    let none = json::to_value(Outcome::no_passed_skills()).unwrap();
    assert_eq!(none, json::json!({ "message": "no passed skills" }));
  }
}
