//! Domain types - identities, endpoints, payloads and windows.

mod endpoint;
mod identity;
mod payload;
mod submission;
mod window;

pub use endpoint::Endpoint;
pub use identity::{Identity, MAX_IDENTITY_LEN};
pub use payload::{AllowedMentions, DispatchPayload, MAX_EMBEDS, MentionPolicy, truncate_chars};
pub use submission::Submission;
pub use window::WindowKind;
