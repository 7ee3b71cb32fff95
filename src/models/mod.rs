pub mod answer;
pub mod leaderboard;
pub mod question;
pub mod quiz;
pub mod user;

pub use answer::Answer;
pub use leaderboard::LeaderboardEntry;
pub use question::Question;
pub use quiz::{Quiz, QuizStatus};
pub use user::User;
