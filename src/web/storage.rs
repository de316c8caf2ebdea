//! High score in `localStorage`.

use web_sys::{Storage, window};

use crate::session::ScoreStore;

/// Leading-digit parse: `"120"` and `"120pts"` read as 120, garbage as 0.
pub fn parse_score(raw: &str) -> u32 {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

pub struct LocalStore {
    key: String,
}

impl LocalStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<Storage> {
        window()?.local_storage().ok().flatten()
    }
}

impl ScoreStore for LocalStore {
    fn load(&self) -> u32 {
        let Some(storage) = Self::storage() else {
            log::warn!("localStorage unavailable, high score starts at 0");
            return 0;
        };
        match storage.get_item(&self.key) {
            Ok(Some(raw)) => parse_score(&raw),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("reading {} failed: {e:?}", self.key);
                0
            }
        }
    }

    fn save(&mut self, score: u32) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if let Err(e) = storage.set_item(&self.key, &score.to_string()) {
            log::warn!("writing {} failed: {e:?}", self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_score_accepts_leading_digits_only() {
        assert_eq!(parse_score("120"), 120);
        assert_eq!(parse_score(" 42 "), 42);
        assert_eq!(parse_score("77pts"), 77);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("-5"), 0);
    }
}
