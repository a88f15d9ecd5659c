//! Prompt builders for every reading type. Each prompt carries the persona
//! and the structure the reading should follow; the generation client sends
//! it verbatim.

use crate::services::dialogue::{BirthDate, BirthTime};

use super::tarot::{CELTIC_CROSS_POSITIONS, LOVE_SPREAD_POSITIONS, SIMPLE_SPREAD_POSITIONS};
use super::ZodiacSign;

fn spread_lines(positions: &[&str], cards: &[&str]) -> String {
    positions
        .iter()
        .zip(cards)
        .enumerate()
        .map(|(i, (position, card))| format!("{}. {}: {}", i + 1, position, card))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn card_of_day(card: &str) -> String {
    format!(
        "You are a tarot expert. Give a detailed interpretation of \"{card}\" \
         as the card of the day. Describe its meaning and symbolism, how its \
         energy may touch different areas of life today, and finish with \
         practical advice for the day. Keep it deep but easy to follow."
    )
}

pub fn simple_spread(cards: &[&str]) -> String {
    format!(
        "You are an experienced tarot reader. Interpret a Past-Present-Future \
         spread with these cards:\n{}\n\nRead each position, explain how the \
         cards interact to tell one story, and close with practical advice.",
        spread_lines(&SIMPLE_SPREAD_POSITIONS, cards)
    )
}

pub fn celtic_cross(cards: &[&str]) -> String {
    format!(
        "You are a master tarot reader. Interpret a Celtic Cross spread with \
         these cards:\n{}\n\nBreak the interpretation into sections by \
         position, explain each card in its place, and end with an overall \
         conclusion and concrete advice.",
        spread_lines(&CELTIC_CROSS_POSITIONS, cards)
    )
}

pub fn love_spread(cards: &[&str]) -> String {
    format!(
        "You are a tarot expert specializing in relationships. Interpret a \
         love spread with these cards:\n{}\n\nExplain each card in the context \
         of the relationship, the deeper psychology of both partners, and give \
         a forecast with practical advice.",
        spread_lines(&LOVE_SPREAD_POSITIONS, cards)
    )
}

pub fn daily_horoscope(sign: ZodiacSign) -> String {
    format!(
        "You are a professional astrologer. Write today's detailed horoscope \
         for {sign}. Cover the general tendency of the day, career, finances, \
         health, love and personal growth, and add practical recommendations."
    )
}

pub fn compatibility(first: ZodiacSign, second: ZodiacSign) -> String {
    format!(
        "You are a seasoned astrologer. Analyze the compatibility between \
         {first} and {second}: overall potential, romantic and emotional \
         harmony, intellectual understanding, long-term prospects, and likely \
         challenges with ways to overcome them. Score each aspect out of 10. \
         Keep it accessible to readers without astrology background."
    )
}

pub fn natal_chart(birth_date: BirthDate, birth_time: BirthTime, birth_place: &str) -> String {
    format!(
        "You are a professional astrologer. Build a detailed natal chart \
         interpretation for a person born on {birth_date} at {birth_time} in \
         {birth_place}. Cover the sun, moon and ascendant signs, planetary \
         placements and key aspects, personality and character, talents and \
         strengths, potential challenges, and life path recommendations. \
         Structure the text with subheadings and avoid overly technical terms."
    )
}

pub fn forecast(birth_date: BirthDate) -> String {
    format!(
        "You are a professional astrologer. Write a three-month astrological \
         forecast for a person born on {birth_date}. Include the key cosmic \
         influences of the period, a month-by-month breakdown, analysis of \
         career, finances, health and relationships, notably favorable and \
         unfavorable days, and practical recommendations. Be specific and \
         avoid generic phrases that fit everyone."
    )
}

pub fn life_path(number: u32, birth_date: BirthDate) -> String {
    format!(
        "You are a skilled numerologist. Interpret life path number {number} \
         for a person born on {birth_date}: innate talents, trials, and how to \
         live this number well. Keep the tone mystical yet personal."
    )
}

pub fn destiny(number: u32, name: &str) -> String {
    format!(
        "You are a skilled numerologist. Interpret destiny (expression) \
         number {number} derived from the name \"{name}\": talents, goals and \
         the direction this number points to. Keep the tone mystical yet \
         personal."
    )
}

pub fn full_numerology(
    life_path: u32,
    destiny: u32,
    personal_year: u32,
    birth_date: BirthDate,
    name: &str,
) -> String {
    format!(
        "You are a skilled numerologist. Write a full numerology analysis for \
         \"{name}\", born {birth_date}: life path number {life_path}, destiny \
         number {destiny}, personal year number {personal_year}. Interpret \
         each number, then how they interact as one picture, and finish with \
         guidance for the current year."
    )
}

pub fn palm_reading() -> String {
    "You are an experienced palm reader. The querent has sent a photo of \
     their palm. Write a warm palm reading covering the heart line, head \
     line, life line and fate line, what their combination suggests about \
     character and path, and end with gentle practical advice."
        .to_string()
}
