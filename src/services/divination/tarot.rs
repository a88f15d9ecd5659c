use rand::seq::SliceRandom;
use rand::Rng;

/// The major arcana, used for every spread.
pub const MAJOR_ARCANA: [&str; 22] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
    "Wheel of Fortune",
    "Justice",
    "The Hanged Man",
    "Death",
    "Temperance",
    "The Devil",
    "The Tower",
    "The Star",
    "The Moon",
    "The Sun",
    "Judgement",
    "The World",
];

pub const SIMPLE_SPREAD_POSITIONS: [&str; 3] = ["Past", "Present", "Future"];

pub const CELTIC_CROSS_POSITIONS: [&str; 10] = [
    "Present situation",
    "Obstacle",
    "Subconscious, the past",
    "Recent past",
    "Best outcome",
    "Near future",
    "Your fears and doubts",
    "Outside influences",
    "Hopes and expectations",
    "Final outcome",
];

pub const LOVE_SPREAD_POSITIONS: [&str; 5] = [
    "You",
    "Your partner or potential partner",
    "Your feelings",
    "Their feelings",
    "Outcome of the relationship",
];

pub fn draw_card() -> &'static str {
    let mut rng = rand::thread_rng();
    MAJOR_ARCANA[rng.gen_range(0..MAJOR_ARCANA.len())]
}

/// Draws `count` distinct cards, capped at the deck size.
pub fn draw_spread(count: usize) -> Vec<&'static str> {
    let mut rng = rand::thread_rng();
    MAJOR_ARCANA
        .choose_multiple(&mut rng, count.min(MAJOR_ARCANA.len()))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_draw_card_comes_from_deck() {
        for _ in 0..50 {
            assert!(MAJOR_ARCANA.contains(&draw_card()));
        }
    }

    #[test]
    fn test_draw_spread_is_unique() {
        for _ in 0..20 {
            let cards = draw_spread(10);
            assert_eq!(cards.len(), 10);
            let unique: HashSet<_> = cards.iter().collect();
            assert_eq!(unique.len(), 10);
        }
    }

    #[test]
    fn test_draw_spread_caps_at_deck_size() {
        assert_eq!(draw_spread(100).len(), MAJOR_ARCANA.len());
    }
}
