pub mod evaluation;
pub mod recipe;
pub mod recipe_ingredient;
pub mod recipe_skill;
pub mod recipe_step;
pub mod recipe_step_image;
pub mod skill;
pub mod skill_evaluation;
pub mod step_photo;
pub mod submission;
pub mod submission_step_image;
pub mod user;
pub mod user_skill;

pub use submission::SubmissionStatus;
pub use user::Role;
