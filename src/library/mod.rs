pub mod catalog;
pub mod episode;
pub mod session;

pub use episode::Episode;
pub use session::{Bookmarks, RecentlyListened, SessionLibrary, SessionStore};
