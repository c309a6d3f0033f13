mod auth;
mod membership;

pub use auth::TokenManager;
pub use membership::MembershipStore;
pub use membership::PLAYLIST_PAGE_SIZE;
