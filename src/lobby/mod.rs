//! Lobby - room code creation and validation
//!
//! Room codes are display text only. Creating and joining both end in an
//! identical local match.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of every room code
pub const ROOM_CODE_LEN: usize = 6;

const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A six character room code, stored uppercased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Generate a fresh code ("create room")
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..ROOM_CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..ROOM_CODE_ALPHABET.len());
                ROOM_CODE_ALPHABET[idx] as char
            })
            .collect();
        Self(code)
    }

    /// Validate a user supplied code ("join room")
    ///
    /// Input is trimmed and uppercased first, matching the lobby's text field.
    pub fn parse(raw: &str) -> Result<Self, LobbyError> {
        let code = raw.trim().to_ascii_uppercase();
        let len = code.chars().count();
        if len != ROOM_CODE_LEN {
            return Err(LobbyError::WrongLength(len));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RoomCode {
    type Error = LobbyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

/// What the player asked the lobby to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyAction {
    /// Generate a new code
    Create,
    /// Reuse an explicit code
    Join(RoomCode),
}

impl LobbyAction {
    /// Resolve the action to the code the match will display
    pub fn into_room_code<R: Rng + ?Sized>(self, rng: &mut R) -> RoomCode {
        match self {
            LobbyAction::Create => RoomCode::generate(rng),
            LobbyAction::Join(code) => code,
        }
    }
}

/// Lobby errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    #[error("Room code must be exactly 6 characters, got {0}")]
    WrongLength(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn generated_codes_are_six_uppercase_alphanumerics() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let code = RoomCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
            assert!(code
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let a = RoomCode::generate(&mut ChaCha8Rng::seed_from_u64(42));
        let b = RoomCode::generate(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn join_uppercases_input() {
        let code = RoomCode::parse(" ab12cd ").unwrap();
        assert_eq!(code.as_str(), "AB12CD");
    }

    #[test]
    fn join_requires_exactly_six_characters() {
        assert_eq!(RoomCode::parse("ABC"), Err(LobbyError::WrongLength(3)));
        assert_eq!(RoomCode::parse("ABCDEFG"), Err(LobbyError::WrongLength(7)));
        assert_eq!(RoomCode::parse(""), Err(LobbyError::WrongLength(0)));
    }

    #[test]
    fn join_accepts_any_six_characters() {
        assert_eq!(RoomCode::parse("ab-12c").unwrap().as_str(), "AB-12C");
        assert_eq!(RoomCode::parse("#$% _!").unwrap().as_str(), "#$% _!");
    }

    #[test]
    fn create_and_join_resolve_to_codes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let joined = LobbyAction::Join(RoomCode::parse("ZZZ999").unwrap()).into_room_code(&mut rng);
        assert_eq!(joined.as_str(), "ZZZ999");

        let created = LobbyAction::Create.into_room_code(&mut rng);
        assert_eq!(created.as_str().len(), ROOM_CODE_LEN);
    }

    #[test]
    fn serde_validates_codes() {
        let code: RoomCode = serde_json::from_str("\"qwe123\"").unwrap();
        assert_eq!(code.as_str(), "QWE123");
        assert!(serde_json::from_str::<RoomCode>("\"nope\"").is_err());
    }
}
