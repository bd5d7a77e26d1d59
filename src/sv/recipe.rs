use sea_orm::{DatabaseTransaction, sea_query::Expr};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{
    recipe, recipe_ingredient, recipe_skill, recipe_step, recipe_step_image,
    step_photo,
  },
  prelude::*,
  progress, sv,
};

#[derive(Debug, Deserialize)]
pub struct NewIngredient {
  pub name: String,
  pub quantity: Option<String>,
  pub unit: Option<String>,
  pub order_index: Option<i32>,
  pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewStep {
  pub step_number: i32,
  pub title: Option<String>,
  pub instruction: String,
  pub skill_id: Option<Uuid>,
  #[serde(default)]
  pub requires_photo: bool,
  /// reference image urls, kept in the given order
  #[serde(default)]
  pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewRecipe {
  pub title: String,
  pub description: Option<String>,
  pub difficulty: i32,
  pub finish_url: Option<String>,
  #[serde(default)]
  pub skills: Vec<Uuid>,
  #[serde(default)]
  pub ingredients: Vec<NewIngredient>,
  #[serde(default)]
  pub steps: Vec<NewStep>,
}

/// Picture and title, enough for a recipe tile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
  pub recipe_id: Uuid,
  pub title: String,
  pub image_url: Option<String>,
}

impl From<recipe::Model> for Card {
  fn from(recipe: recipe::Model) -> Self {
    Self { recipe_id: recipe.recipe_id, title: recipe.title, image_url: recipe.finish_url }
  }
}

#[derive(Debug, Serialize)]
pub struct Ingredient {
  pub name: String,
  pub quantity: Option<String>,
  pub unit: Option<String>,
  pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChallengeDetail {
  #[serde(flatten)]
  pub card: Card,
  pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Deserialize)]
pub struct StepPhoto {
  pub recipe_id: Option<Uuid>,
  pub step_id: Uuid,
  pub image_url: String,
}

pub struct Recipe<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Recipe<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  fn validate(new: &NewRecipe) -> Result<()> {
    if new.title.trim().is_empty() {
      return Err(Error::bad_request("Recipe title is required"));
    }
    if !(progress::MIN_RANK..=progress::MAX_RANK).contains(&new.difficulty) {
      return Err(Error::bad_request(format!(
        "Difficulty must be between {} and {}",
        progress::MIN_RANK,
        progress::MAX_RANK
      )));
    }
    if let Some(step) = new.steps.iter().find(|s| s.instruction.trim().is_empty()) {
      return Err(Error::bad_request(format!(
        "Step {} has no instruction",
        step.step_number
      )));
    }
    Ok(())
  }

  /// Stores a recipe with its skills, ingredients, steps and step images.
  /// Either everything is written or nothing is.
  pub async fn create(&self, new: NewRecipe) -> Result<recipe::Model> {
    Self::validate(&new)?;

    let skills = sv::Skill::new(self.db);
    let referenced =
      new.skills.iter().chain(new.steps.iter().filter_map(|s| s.skill_id.as_ref()));
    for &skill_id in referenced {
      skills.by_id(skill_id).await?.ok_or(Error::NotFound(Missing::Skill))?;
    }

    let txn = self.db.begin().await?;
    let recipe = Self::insert(&txn, new).await?;
    txn.commit().await?;

    info!("Created recipe `{}` ({})", recipe.title, recipe.recipe_id);
    Ok(recipe)
  }

  async fn insert(txn: &DatabaseTransaction, new: NewRecipe) -> Result<recipe::Model> {
    let recipe_id = Uuid::new_v4();

    let recipe = recipe::ActiveModel {
      recipe_id: Set(recipe_id),
      title: Set(new.title.trim().to_string()),
      description: Set(new.description),
      difficulty: Set(new.difficulty),
      finish_url: Set(new.finish_url),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(txn)
    .await?;

    let mut skills = new.skills;
    skills.sort();
    skills.dedup();
    for skill_id in skills {
      recipe_skill::ActiveModel { recipe_id: Set(recipe_id), skill_id: Set(skill_id) }
        .insert(txn)
        .await?;
    }

    for ing in new.ingredients {
      recipe_ingredient::ActiveModel {
        ingredient_id: Set(Uuid::new_v4()),
        recipe_id: Set(recipe_id),
        name: Set(ing.name),
        quantity: Set(ing.quantity),
        unit: Set(ing.unit),
        order_index: Set(ing.order_index),
        note: Set(ing.note),
      }
      .insert(txn)
      .await?;
    }

    for step in new.steps {
      let step_id = Uuid::new_v4();
      recipe_step::ActiveModel {
        step_id: Set(step_id),
        recipe_id: Set(recipe_id),
        step_number: Set(step.step_number),
        title: Set(step.title),
        instruction: Set(step.instruction),
        skill_id: Set(step.skill_id),
        requires_photo: Set(step.requires_photo),
      }
      .insert(txn)
      .await?;

      for (idx, url) in step.images.into_iter().enumerate() {
        recipe_step_image::ActiveModel {
          image_id: Set(Uuid::new_v4()),
          step_id: Set(step_id),
          image_url: Set(url),
          order_index: Set(Some(idx as i32)),
        }
        .insert(txn)
        .await?;
      }
    }

    Ok(recipe)
  }

  pub async fn all(&self) -> Result<Vec<recipe::Model>> {
    let recipes = recipe::Entity::find()
      .order_by_asc(recipe::Column::Difficulty)
      .order_by_asc(recipe::Column::Title)
      .all(self.db)
      .await?;
    Ok(recipes)
  }

  pub async fn by_id(&self, recipe_id: Uuid) -> Result<recipe::Model> {
    recipe::Entity::find_by_id(recipe_id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound(Missing::Recipe))
  }

  /// Random sample of recipes whose difficulty equals the user's rank.
  pub async fn recommended(&self, user_id: Uuid, count: u64) -> Result<Vec<Card>> {
    let user = sv::User::new(self.db).get(user_id).await?;

    let recipes = recipe::Entity::find()
      .filter(recipe::Column::Difficulty.eq(user.rank))
      .order_by_asc(Expr::cust("RANDOM()"))
      .limit(count)
      .all(self.db)
      .await?;

    Ok(recipes.into_iter().map(Card::from).collect())
  }

  /// Recipes that practise `skill_id`.
  pub async fn challenges(&self, skill_id: Uuid) -> Result<Vec<Card>> {
    let recipes = recipe::Entity::find()
      .inner_join(recipe_skill::Entity)
      .filter(recipe_skill::Column::SkillId.eq(skill_id))
      .order_by_asc(recipe::Column::Difficulty)
      .all(self.db)
      .await?;

    Ok(recipes.into_iter().map(Card::from).collect())
  }

  pub async fn challenge_detail(&self, recipe_id: Uuid) -> Result<ChallengeDetail> {
    let recipe = self.by_id(recipe_id).await?;

    let ingredients = recipe_ingredient::Entity::find()
      .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
      .order_by_asc(recipe_ingredient::Column::OrderIndex)
      .all(self.db)
      .await?
      .into_iter()
      .map(|i| Ingredient { name: i.name, quantity: i.quantity, unit: i.unit, note: i.note })
      .collect();

    Ok(ChallengeDetail { card: recipe.into(), ingredients })
  }

  pub async fn steps(&self, recipe_id: Uuid) -> Result<Vec<recipe_step::Model>> {
    let steps = recipe_step::Entity::find()
      .filter(recipe_step::Column::RecipeId.eq(recipe_id))
      .order_by_asc(recipe_step::Column::StepNumber)
      .all(self.db)
      .await?;
    Ok(steps)
  }

  /// Adds a photo to the user's personal step history.
  pub async fn save_step_photo(
    &self,
    user_id: Uuid,
    photo: StepPhoto,
  ) -> Result<step_photo::Model> {
    if photo.image_url.trim().is_empty() {
      return Err(Error::bad_request("image_url is required"));
    }

    let step = recipe_step::Entity::find_by_id(photo.step_id)
      .one(self.db)
      .await?
      .ok_or_else(|| Error::bad_request("Unknown step"))?;
    if photo.recipe_id.is_some_and(|recipe| recipe != step.recipe_id) {
      return Err(Error::bad_request("Step does not belong to the recipe"));
    }

    let photo = step_photo::ActiveModel {
      photo_id: Set(Uuid::new_v4()),
      user_id: Set(user_id),
      recipe_id: Set(Some(step.recipe_id)),
      step_id: Set(step.step_id),
      image_url: Set(photo.image_url),
      uploaded_at: Set(Utc::now().naive_utc()),
    };

    Ok(photo.insert(self.db).await?)
  }
}

#[cfg(test)]
mod tests {
  use sea_orm::PaginatorTrait;

  use super::*;
  use crate::{entity::Role, testing};

  fn pasta(skills: Vec<Uuid>) -> NewRecipe {
    NewRecipe {
      title: "Carbonara".into(),
      description: Some("Roman classic".into()),
      difficulty: 3,
      finish_url: Some("https://img.example/carbonara.jpg".into()),
      skills: skills.clone(),
      ingredients: vec![
        NewIngredient {
          name: "Pecorino".into(),
          quantity: Some("50".into()),
          unit: Some("g".into()),
          order_index: Some(2),
          note: None,
        },
        NewIngredient {
          name: "Spaghetti".into(),
          quantity: Some("200".into()),
          unit: Some("g".into()),
          order_index: Some(1),
          note: None,
        },
      ],
      steps: vec![NewStep {
        step_number: 1,
        title: None,
        instruction: "Boil the pasta".into(),
        skill_id: skills.first().copied(),
        requires_photo: true,
        images: vec!["https://img.example/boil-1.jpg".into(), "https://img.example/boil-2.jpg".into()],
      }],
    }
  }

  #[tokio::test]
  async fn test_create_writes_every_part() {
    let db = testing::setup_db().await;
    let boil = testing::skill(&db, "boil").await;
    let sv = Recipe::new(&db);

    let recipe = sv.create(pasta(vec![boil.skill_id])).await.unwrap();

    let steps = sv.steps(recipe.recipe_id).await.unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].skill_id, Some(boil.skill_id));
    assert_eq!(
      recipe_step_image::Entity::find()
        .filter(recipe_step_image::Column::StepId.eq(steps[0].step_id))
        .count(&db)
        .await
        .unwrap(),
      2
    );

    let detail = sv.challenge_detail(recipe.recipe_id).await.unwrap();
    let names: Vec<_> = detail.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Spaghetti", "Pecorino"]);
    assert_eq!(detail.card.image_url.as_deref(), Some("https://img.example/carbonara.jpg"));
  }

  #[tokio::test]
  async fn test_create_validates_before_writing() {
    let db = testing::setup_db().await;
    let sv = Recipe::new(&db);

    let mut hard = pasta(vec![]);
    hard.difficulty = 11;
    assert!(matches!(sv.create(hard).await, Err(Error::BadRequest(_))));

    let unknown = pasta(vec![Uuid::new_v4()]);
    assert!(matches!(sv.create(unknown).await, Err(Error::NotFound(Missing::Skill))));

    assert!(sv.all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_recommended_matches_rank() {
    let db = testing::setup_db().await;
    let user = testing::user(&db, Role::User).await;
    for difficulty in [1, 1, 1, 1, 2] {
      testing::recipe(&db, difficulty).await;
    }
    let sv = Recipe::new(&db);

    let picks = sv.recommended(user.user_id, 3).await.unwrap();
    assert_eq!(picks.len(), 3);
    for pick in &picks {
      assert_eq!(sv.by_id(pick.recipe_id).await.unwrap().difficulty, 1);
    }

    sv::User::new(&db).set_rank(user.user_id, 2).await.unwrap();
    assert_eq!(sv.recommended(user.user_id, 3).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_challenges_by_skill() {
    let db = testing::setup_db().await;
    let knife = testing::skill(&db, "knife").await;
    let fire = testing::skill(&db, "fire").await;
    let sv = Recipe::new(&db);

    let salad = sv.create(NewRecipe { title: "Salad".into(), ..pasta(vec![knife.skill_id]) })
      .await
      .unwrap();
    sv.create(pasta(vec![fire.skill_id])).await.unwrap();

    let cards = sv.challenges(knife.skill_id).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].recipe_id, salad.recipe_id);
  }

  #[tokio::test]
  async fn test_step_photo_checks_recipe() {
    let db = testing::setup_db().await;
    let user = testing::user(&db, Role::User).await;
    let recipe = testing::recipe(&db, 1).await;
    let other = testing::recipe(&db, 2).await;
    let step = testing::step(&db, recipe.recipe_id, 1).await;
    let sv = Recipe::new(&db);

    let photo = sv
      .save_step_photo(
        user.user_id,
        StepPhoto { recipe_id: None, step_id: step.step_id, image_url: "https://img.example/p.jpg".into() },
      )
      .await
      .unwrap();
    assert_eq!(photo.recipe_id, Some(recipe.recipe_id));

    let res = sv
      .save_step_photo(
        user.user_id,
        StepPhoto {
          recipe_id: Some(other.recipe_id),
          step_id: step.step_id,
          image_url: "https://img.example/p.jpg".into(),
        },
      )
      .await;
    assert!(matches!(res, Err(Error::BadRequest(_))));
  }
}
