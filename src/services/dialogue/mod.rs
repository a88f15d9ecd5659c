mod model;

pub use model::*;

use crate::services::user::UserRecord;

/// Transition helpers for the conversation state machine. All of them run
/// inside a `SessionRepository::update` closure, so a transition and any
/// coin movement it implies land in one per-user critical section.
pub struct DialogueService;

impl DialogueService {
    pub fn enter_mode(user: &mut UserRecord, mode: ConversationState) {
        user.conversation = mode;
    }

    pub fn back_to_main(user: &mut UserRecord) {
        user.conversation = ConversationState::Idle;
    }

    /// Deduct-then-transition as one step. On insufficient funds nothing
    /// changes: no coins move and the state stays where it was.
    pub fn begin_paid_flow(user: &mut UserRecord, cost: u32, next: ConversationState) -> bool {
        if !user.deduct(cost) {
            return false;
        }
        user.conversation = next;
        true
    }

    /// A finished or terminally failed flow drops back to the parent mode's
    /// menu; the user stays in the mode until they leave it explicitly.
    pub fn finish_flow(user: &mut UserRecord) {
        user.conversation = match &user.conversation {
            ConversationState::Idle => ConversationState::Idle,
            ConversationState::Tarot(_) => ConversationState::Tarot(TarotState::Menu),
            ConversationState::Palmistry(_) => ConversationState::Palmistry(PalmistryState::Menu),
            ConversationState::Astrology(_) => ConversationState::Astrology(AstrologyState::Menu),
            ConversationState::Numerology(_) => {
                ConversationState::Numerology(NumerologyState::Menu)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user::STARTING_COINS;
    use teloxide::types::UserId;

    fn test_user() -> UserRecord {
        UserRecord::new(UserId(1), "Test", None)
    }

    fn broke_user() -> UserRecord {
        let mut user = test_user();
        assert!(user.deduct(STARTING_COINS));
        user
    }

    #[test]
    fn test_begin_paid_flow_transitions_on_success() {
        let mut user = test_user();
        let next = ConversationState::Astrology(AstrologyState::NatalChart(
            NatalChartStep::AwaitingBirthDate,
        ));

        assert!(DialogueService::begin_paid_flow(&mut user, 5, next.clone()));
        assert_eq!(user.coins, 0);
        assert_eq!(user.conversation, next);
    }

    #[test]
    fn test_begin_paid_flow_no_transition_when_broke() {
        let mut user = broke_user();
        DialogueService::enter_mode(&mut user, ConversationState::Astrology(AstrologyState::Menu));

        let charged = DialogueService::begin_paid_flow(
            &mut user,
            5,
            ConversationState::Astrology(AstrologyState::AwaitingForecastBirthDate),
        );

        assert!(!charged);
        assert_eq!(user.coins, 0);
        assert_eq!(
            user.conversation,
            ConversationState::Astrology(AstrologyState::Menu)
        );
    }

    #[test]
    fn test_finish_flow_returns_to_mode_menu() {
        let mut user = test_user();
        user.conversation = ConversationState::Numerology(NumerologyState::AwaitingDestinyName);

        DialogueService::finish_flow(&mut user);

        assert_eq!(
            user.conversation,
            ConversationState::Numerology(NumerologyState::Menu)
        );
    }

    #[test]
    fn test_back_to_main_resets_everything() {
        let mut user = test_user();
        user.conversation = ConversationState::Astrology(AstrologyState::Compatibility {
            first_sign: Some(crate::services::divination::ZodiacSign::Leo),
        });

        DialogueService::back_to_main(&mut user);

        assert_eq!(user.conversation, ConversationState::Idle);
    }
}
