pub mod evaluation;
pub mod identity;
pub mod recipe;
pub mod skill;
pub mod submission;
pub mod user;

pub use evaluation::Evaluation;
pub use identity::Identity;
pub use recipe::Recipe;
pub use skill::Skill;
pub use submission::Submission;
pub use user::User;
