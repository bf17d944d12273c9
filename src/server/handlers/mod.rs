pub mod generate;
pub mod health;
pub mod library;
pub mod podugenius;

pub use generate::generate_podcast;
pub use health::{health, test_db};
pub use library::{add_bookmark, list_bookmarks, list_episodes, list_recent, record_play, remove_bookmark, subjects};
pub use podugenius::podugenius;
