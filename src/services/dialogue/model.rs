use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::services::divination::ZodiacSign;

/// Per-user conversation position. One mode is active at a time; every
/// wizard step is an explicit variant carrying the slots filled so far, so
/// "which answer is this" is never inferred from a loose data bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    Tarot(TarotState),
    Palmistry(PalmistryState),
    Astrology(AstrologyState),
    Numerology(NumerologyState),
}

impl ConversationState {
    pub fn mode_name(&self) -> &'static str {
        match self {
            ConversationState::Idle => "main",
            ConversationState::Tarot(_) => "tarot",
            ConversationState::Palmistry(_) => "palmistry",
            ConversationState::Astrology(_) => "astrology",
            ConversationState::Numerology(_) => "numerology",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TarotState {
    Menu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PalmistryState {
    Menu,
    AwaitingPalmPhoto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstrologyState {
    Menu,
    AwaitingHoroscopeSign,
    Compatibility { first_sign: Option<ZodiacSign> },
    NatalChart(NatalChartStep),
    AwaitingForecastBirthDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NatalChartStep {
    AwaitingBirthDate,
    AwaitingBirthTime {
        birth_date: BirthDate,
    },
    AwaitingBirthPlace {
        birth_date: BirthDate,
        birth_time: BirthTime,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumerologyState {
    Menu,
    AwaitingLifePathDate,
    AwaitingDestinyName,
    FullAnalysis(FullAnalysisStep),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FullAnalysisStep {
    AwaitingBirthDate,
    AwaitingFullName { birth_date: BirthDate },
}

/// Calendar-validated birth date, rendered back as DD.MM.YYYY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDate(pub NaiveDate);

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d.%m.%Y"))
    }
}

/// 24-hour birth time, rendered back as HH:MM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthTime(pub NaiveTime);

impl fmt::Display for BirthTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}
