pub mod leaderboard;
pub mod storage;
pub mod types;

pub use leaderboard::{leaderboard, HouseStanding};
pub use storage::{get_data_path, load_data, save_data};
pub use types::{HouseCupData, ScoreInput, DATA_VERSION};
