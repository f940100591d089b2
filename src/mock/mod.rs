mod auth;
mod storage;

pub use auth::MockAuth;
pub use storage::{MockBucket, MockFile, MockStorage};

pub const MOCK_UID: &str = "mock-user-123";
pub const MOCK_EMAIL: &str = "mock@example.com";
pub const MOCK_DISPLAY_NAME: &str = "Mock User";
pub const MOCK_PICTURE_URL: &str = "https://via.placeholder.com/150";
pub const MOCK_SIGNED_URL: &str = "https://mock-storage-url.com/file.mp4";
