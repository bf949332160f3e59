//! Static lookup tables used while rendering reports.
//!
//! All tables are plain constant data indexed by 1-based house or nakshatra
//! numbers; out-of-range lookups return `None` or a neutral fallback.

use super::planet::Planet;

/// Life areas signified by each Bhava, indexed by house number - 1.
pub const HOUSE_SIGNIFICANCES: [&str; 12] = [
    "Self, Personality, Physique",
    "Wealth, Family, Speech",
    "Courage, Siblings, Short Travel",
    "Home, Mother, Comforts",
    "Children, Intelligence, Past Karma",
    "Health, Debts, Enemies",
    "Marriage, Partnerships, Business",
    "Longevity, Occult, Sudden Gains",
    "Fortune, Father, Long Travel",
    "Career, Status, Authority",
    "Gains, Friends, Aspirations",
    "Losses, Isolation, Moksha",
];

/// Vimshottari star-lord cycle; nakshatra N is ruled by `STAR_LORD_CYCLE[(N - 1) % 9]`.
pub const STAR_LORD_CYCLE: [Planet; 9] = [
    Planet::Ketu,
    Planet::Venus,
    Planet::Sun,
    Planet::Moon,
    Planet::Mars,
    Planet::Rahu,
    Planet::Jupiter,
    Planet::Saturn,
    Planet::Mercury,
];

/// Houses aspected from each house (itself, +4, +8), indexed by house number - 1.
pub const ASPECT_MAP: [[u8; 3]; 12] = [
    [1, 5, 9],
    [2, 6, 10],
    [3, 7, 11],
    [4, 8, 12],
    [5, 9, 1],
    [6, 10, 2],
    [7, 11, 3],
    [8, 12, 4],
    [9, 1, 5],
    [10, 2, 6],
    [11, 3, 7],
    [12, 4, 8],
];

/// Sign lordship, Aries through Pisces.
pub const SIGN_LORDS: [(&str, Planet); 12] = [
    ("Aries", Planet::Mars),
    ("Taurus", Planet::Venus),
    ("Gemini", Planet::Mercury),
    ("Cancer", Planet::Moon),
    ("Leo", Planet::Sun),
    ("Virgo", Planet::Mercury),
    ("Libra", Planet::Venus),
    ("Scorpio", Planet::Mars),
    ("Sagittarius", Planet::Jupiter),
    ("Capricorn", Planet::Saturn),
    ("Aquarius", Planet::Saturn),
    ("Pisces", Planet::Jupiter),
];

/// Significance of a house, or a generic label outside 1..=12.
pub fn house_significance(house: u8) -> &'static str {
    house
        .checked_sub(1)
        .and_then(|i| HOUSE_SIGNIFICANCES.get(i as usize))
        .copied()
        .unwrap_or("General Life Area")
}

/// Star lord of a 1-based nakshatra number (1..=27).
pub fn star_lord(nakshatra_no: u8) -> Option<Planet> {
    if !(1..=27).contains(&nakshatra_no) {
        return None;
    }
    Some(STAR_LORD_CYCLE[((nakshatra_no - 1) % 9) as usize])
}

/// Houses aspected from `house`.
pub fn aspected_houses(house: u8) -> Option<[u8; 3]> {
    house
        .checked_sub(1)
        .and_then(|i| ASPECT_MAP.get(i as usize))
        .copied()
}

/// Lord of a zodiac sign, matched case-insensitively.
pub fn sign_lord(sign: &str) -> Option<Planet> {
    let sign = sign.trim();
    SIGN_LORDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(sign))
        .map(|(_, lord)| *lord)
}
