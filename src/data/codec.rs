use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// SymbolMap – reversible digit/period → glyph substitution
// ---------------------------------------------------------------------------

/// Characters a symbol map is allowed to substitute.
const SOURCE_CHARS: [char; 11] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.'];

/// Glyph substitutions observed in the instrument's word-processor exports.
const DEFAULT_PAIRS: [(char, char); 11] = [
    ('0', '°'),
    ('1', '1'),
    ('2', '2'),
    ('3', '³'),
    ('4', '4'),
    ('5', 'µ'),
    ('6', '¶'),
    ('7', '7'),
    ('8', '8'),
    ('9', '¹'),
    ('.', '®'),
];

/// Why an operator-supplied symbol map could not be used.
/// Always recovered by falling back to the default map.
#[derive(Debug)]
pub enum ConfigError {
    NotAMapping(serde_json::Error),
    InvalidGlyph { source: char, glyph: String },
    NotInjective { glyph: char },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotAMapping(err) => {
                write!(
                    f,
                    "symbol map is not a JSON object of string-to-string pairs: {err}"
                )
            }
            ConfigError::InvalidGlyph { source, glyph } => {
                write!(
                    f,
                    "glyph for '{source}' must be a single character, got {glyph:?}"
                )
            }
            ConfigError::NotInjective { glyph } => {
                write!(f, "glyph '{glyph}' is assigned to more than one character")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::NotAMapping(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::NotAMapping(err)
    }
}

/// Bidirectional mapping between the eleven numeric source characters
/// (`0`-`9` and `.`) and their substitute glyphs. Immutable once built.
#[derive(Debug, Clone)]
pub struct SymbolMap {
    /// source character → glyph
    forward: BTreeMap<char, char>,
    /// glyph → source character
    reverse: BTreeMap<char, char>,
}

impl Default for SymbolMap {
    fn default() -> Self {
        let forward: BTreeMap<char, char> = DEFAULT_PAIRS.iter().copied().collect();
        let reverse: BTreeMap<char, char> = DEFAULT_PAIRS.iter().map(|&(s, g)| (g, s)).collect();
        SymbolMap { forward, reverse }
    }
}

impl SymbolMap {
    /// Build a map from raw string pairs.
    ///
    /// Keys that are not one of the eleven source characters are tolerated
    /// and skipped; a glyph that is not exactly one character, or that is
    /// assigned to more than one source character, fails the build.
    pub fn build(raw: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut forward = BTreeMap::new();
        let mut reverse = BTreeMap::new();

        for (key, value) in raw {
            let mut key_chars = key.chars();
            let source = match (key_chars.next(), key_chars.next()) {
                (Some(c), None) if SOURCE_CHARS.contains(&c) => c,
                // Unknown key: tolerated but unused.
                _ => continue,
            };

            let mut glyph_chars = value.chars();
            let glyph = match (glyph_chars.next(), glyph_chars.next()) {
                (Some(g), None) => g,
                _ => {
                    return Err(ConfigError::InvalidGlyph {
                        source,
                        glyph: value.clone(),
                    });
                }
            };

            if reverse.insert(glyph, source).is_some() {
                return Err(ConfigError::NotInjective { glyph });
            }
            forward.insert(source, glyph);
        }

        Ok(SymbolMap { forward, reverse })
    }

    /// Parse an operator-edited JSON object into a map.
    ///
    /// Strict structured parse only: literal string-to-string pairs, nothing
    /// else. Any failure falls back to the default map; the error is
    /// returned alongside so the UI can surface a warning instead of
    /// aborting the run.
    pub fn from_config(text: &str) -> (Self, Option<ConfigError>) {
        let raw: Result<BTreeMap<String, String>, _> = serde_json::from_str(text);
        match raw {
            Ok(raw) => match Self::build(&raw) {
                Ok(map) => (map, None),
                Err(err) => (Self::default(), Some(err)),
            },
            Err(err) => (Self::default(), Some(ConfigError::NotAMapping(err))),
        }
    }

    /// Replace glyphs with the source characters they stand for.
    /// Characters outside the glyph set pass through unchanged.
    pub fn decode(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.reverse.get(&c).copied().unwrap_or(c))
            .collect()
    }

    /// Replace source characters with their glyphs (the direction the
    /// instrument's export applies). Used by the sample generator and the
    /// round-trip tests; decoding never needs it.
    pub fn encode(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.forward.get(&c).copied().unwrap_or(c))
            .collect()
    }

    /// (source, glyph) pairs in source-character order, for display.
    pub fn pairs(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.forward.iter().map(|(&s, &g)| (s, g))
    }

    /// The default map as editable JSON, used to seed the config editor.
    pub fn default_config_text() -> String {
        let raw: BTreeMap<String, String> = DEFAULT_PAIRS
            .iter()
            .map(|&(s, g)| (s.to_string(), g.to_string()))
            .collect();
        serde_json::to_string_pretty(&raw).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_round_trips_digit_strings() {
        let map = SymbolMap::default();
        for s in ["190", "85.3", "0.123456789", "1100"] {
            assert_eq!(map.decode(&map.encode(s)), s);
        }
    }

    #[test]
    fn decode_recovers_glyph_laden_line() {
        let map = SymbolMap::default();
        assert_eq!(map.decode("1¹° µ¶®³"), "190 56.3");
    }

    #[test]
    fn non_glyph_characters_pass_through() {
        let map = SymbolMap::default();
        assert_eq!(map.decode("abc -~ 1"), "abc -~ 1");
    }

    #[test]
    fn custom_map_round_trips() {
        let raw: BTreeMap<String, String> = [("0", "a"), ("1", "b"), (".", "!")]
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let map = SymbolMap::build(&raw).unwrap();
        assert_eq!(map.encode("10.0"), "ba!a");
        assert_eq!(map.decode("ba!a"), "10.0");
    }

    #[test]
    fn unknown_keys_are_tolerated_but_unused() {
        let raw: BTreeMap<String, String> = [("x", "!"), ("wavelength", "?"), ("5", "z")]
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let map = SymbolMap::build(&raw).unwrap();
        assert_eq!(map.decode("z!?"), "5!?");
    }

    #[test]
    fn non_injective_map_fails_the_build() {
        let raw: BTreeMap<String, String> = [("1", "x"), ("2", "x")]
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(matches!(
            SymbolMap::build(&raw),
            Err(ConfigError::NotInjective { glyph: 'x' })
        ));
    }

    #[test]
    fn multi_character_glyph_fails_the_build() {
        let raw: BTreeMap<String, String> =
            [("3".to_string(), "abc".to_string())].into_iter().collect();
        assert!(matches!(
            SymbolMap::build(&raw),
            Err(ConfigError::InvalidGlyph { source: '3', .. })
        ));
    }

    #[test]
    fn invalid_config_falls_back_to_default() {
        for text in ["not json", "[1, 2]", r#"{"0": 3}"#, r#"{"1": "x", "2": "x"}"#] {
            let (map, err) = SymbolMap::from_config(text);
            assert!(err.is_some(), "expected a config error for {text:?}");
            assert_eq!(map.decode("°¹"), "09");
        }
    }

    #[test]
    fn valid_config_reports_no_error() {
        let (map, err) = SymbolMap::from_config(&SymbolMap::default_config_text());
        assert!(err.is_none());
        assert_eq!(map.decode("1¹°"), "190");
    }
}
