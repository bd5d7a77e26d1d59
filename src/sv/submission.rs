use serde::{Deserialize, Serialize};

use crate::{
  auth::Permission,
  entity::{SubmissionStatus, recipe_step, step_photo, submission, submission_step_image},
  prelude::*,
  sv,
};

#[derive(Debug, Deserialize)]
pub struct SubmissionPhoto {
  pub submission_id: Uuid,
  pub step_id: Uuid,
  pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
  Completed,
  AlreadySubmitted,
}

impl Completion {
  pub fn message(self) -> &'static str {
    match self {
      Completion::Completed => "Submission completed",
      Completion::AlreadySubmitted => "Already submitted",
    }
  }
}

#[derive(Debug, Serialize)]
pub struct Detail {
  pub submission: submission::Model,
  pub images: Vec<submission_step_image::Model>,
}

pub struct Submission<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Submission<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn by_id(&self, submission_id: Uuid) -> Result<submission::Model> {
    submission::Entity::find_by_id(submission_id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound(Missing::Submission))
  }

  /// Loads a submission the caller is allowed to mutate.
  async fn owned(&self, user_id: Uuid, submission_id: Uuid) -> Result<submission::Model> {
    let submission = self.by_id(submission_id).await?;
    if submission.user_id != user_id {
      warn!("{user_id} tried to modify submission {submission_id}");
      return Err(Error::Forbidden("Not the owner of this submission"));
    }
    Ok(submission)
  }

  pub async fn start(&self, user_id: Uuid, recipe_id: Uuid) -> Result<submission::Model> {
    sv::User::new(self.db).get(user_id).await?;
    sv::Recipe::new(self.db).by_id(recipe_id).await?;

    let submission = submission::ActiveModel {
      submission_id: Set(Uuid::new_v4()),
      user_id: Set(user_id),
      recipe_id: Set(recipe_id),
      status: Set(SubmissionStatus::InProgress),
      feedback: Set(None),
      created_at: Set(Utc::now().naive_utc()),
      submitted_at: Set(None),
    };

    Ok(submission.insert(self.db).await?)
  }

  /// Attaches a step photo to an in-progress submission and to the owner's
  /// personal step history.
  pub async fn save_step_photo(
    &self,
    user_id: Uuid,
    photo: SubmissionPhoto,
  ) -> Result<submission_step_image::Model> {
    if photo.image_url.trim().is_empty() {
      return Err(Error::bad_request("image_url is required"));
    }

    let submission = self.owned(user_id, photo.submission_id).await?;
    if submission.status != SubmissionStatus::InProgress {
      return Err(Error::bad_request("Submission is already submitted"));
    }

    let step = recipe_step::Entity::find_by_id(photo.step_id).one(self.db).await?;
    if step.is_none_or(|step| step.recipe_id != submission.recipe_id) {
      return Err(Error::bad_request("Step does not belong to the submitted recipe"));
    }

    let now = Utc::now().naive_utc();
    let txn = self.db.begin().await?;

    step_photo::ActiveModel {
      photo_id: Set(Uuid::new_v4()),
      user_id: Set(user_id),
      recipe_id: Set(Some(submission.recipe_id)),
      step_id: Set(photo.step_id),
      image_url: Set(photo.image_url.clone()),
      uploaded_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let image = submission_step_image::ActiveModel {
      image_id: Set(Uuid::new_v4()),
      submission_id: Set(submission.submission_id),
      step_id: Set(photo.step_id),
      image_url: Set(photo.image_url),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(image)
  }

  /// `in_progress -> submitted`. Completing twice is a no-op and keeps the
  /// first `submitted_at`.
  pub async fn complete(&self, user_id: Uuid, submission_id: Uuid) -> Result<Completion> {
    let submission = self.owned(user_id, submission_id).await?;
    if submission.status == SubmissionStatus::Submitted {
      return Ok(Completion::AlreadySubmitted);
    }

    submission::ActiveModel {
      status: Set(SubmissionStatus::Submitted),
      submitted_at: Set(Some(Utc::now().naive_utc())),
      ..submission.into()
    }
    .update(self.db)
    .await?;

    info!("Submission {submission_id} completed by {user_id}");
    Ok(Completion::Completed)
  }

  /// Visible to the owner and to roles that review submissions.
  pub async fn detail(&self, user_id: Uuid, submission_id: Uuid) -> Result<Detail> {
    let submission = self.by_id(submission_id).await?;
    if submission.user_id != user_id {
      sv::User::new(self.db)
        .authorize(user_id, Permission::ReviewSubmissions)
        .await?;
    }

    let images = submission_step_image::Entity::find()
      .filter(submission_step_image::Column::SubmissionId.eq(submission_id))
      .all(self.db)
      .await?;

    Ok(Detail { submission, images })
  }
}
