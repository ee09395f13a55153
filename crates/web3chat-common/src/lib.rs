pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, Web3ChatError};
pub use events::{ConversationEvent, EventBus};
pub use id::{new_id, SessionId};
pub use types::{ChatMessage, ConversationState, SessionInfo, SessionOrigin, WELCOME_MESSAGE_ID};
