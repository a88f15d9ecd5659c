use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Button label with the sign's glyph.
    pub fn label(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "♈ Aries",
            ZodiacSign::Taurus => "♉ Taurus",
            ZodiacSign::Gemini => "♊ Gemini",
            ZodiacSign::Cancer => "♋ Cancer",
            ZodiacSign::Leo => "♌ Leo",
            ZodiacSign::Virgo => "♍ Virgo",
            ZodiacSign::Libra => "♎ Libra",
            ZodiacSign::Scorpio => "♏ Scorpio",
            ZodiacSign::Sagittarius => "♐ Sagittarius",
            ZodiacSign::Capricorn => "♑ Capricorn",
            ZodiacSign::Aquarius => "♒ Aquarius",
            ZodiacSign::Pisces => "♓ Pisces",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }

    pub fn callback_data(&self) -> String {
        format!("sign_{}", self.slug())
    }

    pub fn from_callback_data(data: &str) -> Option<ZodiacSign> {
        let slug = data.strip_prefix("sign_")?;
        ZodiacSign::ALL.into_iter().find(|sign| sign.slug() == slug)
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Plain name for prompts and logs.
        let label = self.label();
        write!(f, "{}", label.split_once(' ').map(|(_, name)| name).unwrap_or(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_round_trip() {
        for sign in ZodiacSign::ALL {
            assert_eq!(ZodiacSign::from_callback_data(&sign.callback_data()), Some(sign));
        }
    }

    #[test]
    fn test_from_callback_rejects_unknown() {
        assert_eq!(ZodiacSign::from_callback_data("sign_ophiuchus"), None);
        assert_eq!(ZodiacSign::from_callback_data("aries"), None);
    }

    #[test]
    fn test_display_is_plain_name() {
        assert_eq!(ZodiacSign::Leo.to_string(), "Leo");
        assert_eq!(ZodiacSign::Capricorn.to_string(), "Capricorn");
    }
}
