pub mod feedback_http;
pub mod memory_rooms;
pub mod video_provider;

pub use feedback_http::HttpFeedbackTransport;
pub use memory_rooms::InMemoryRoomProvider;
pub use video_provider::HttpRoomProvider;
