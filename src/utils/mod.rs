pub mod keyboard;
pub mod validation;

mod text;

pub use text::{chunk_text, MAX_MESSAGE_LEN};

use chrono::{DateTime, Local, Utc};
use teloxide::types::{ChatId, UserId};

/// The private chat with a user shares the user's numeric id.
pub fn chat_of(user_id: UserId) -> ChatId {
    ChatId(user_id.0 as i64)
}

pub fn format_expiry(expires_at: DateTime<Utc>) -> String {
    expires_at.with_timezone(&Local).format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_of_private_chat() {
        assert_eq!(chat_of(UserId(42)), ChatId(42));
    }
}
