//! Station name ↔ URL path token codec.
//!
//! Station names are shown verbatim in paths, so instead of percent-encoding
//! the few characters that cause trouble we substitute short, readable
//! sequences:
//!
//! | character | token text |
//! |-----------|------------|
//! | `/`       | `-:-`      |
//! | `ß`       | `-ss-`     |
//! | `-`       | `--`       |
//!
//! Every sequence starts with `-` and the hyphen itself is escaped, so the
//! substitution is prefix-free and decoding is a single left-to-right scan.

/// Error returned when a path token is not the encoding of any name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station token at byte {position}: {reason}")]
pub struct InvalidToken {
    position: usize,
    reason: &'static str,
}

const SLASH: &str = "-:-";
const SHARP_S: &str = "-ss-";
const HYPHEN: &str = "--";

/// Encode a station display name into a path-safe token.
///
/// # Examples
///
/// ```
/// use directory_server::domain::station_name;
///
/// assert_eq!(station_name::encode("Karlsplatz"), "Karlsplatz");
/// assert_eq!(station_name::encode("Schottentor/Universität"), "Schottentor-:-Universität");
/// assert_eq!(station_name::encode("Straßenbahn"), "Stra-ss-enbahn");
/// ```
pub fn encode(name: &str) -> String {
    let mut token = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '/' => token.push_str(SLASH),
            'ß' => token.push_str(SHARP_S),
            '-' => token.push_str(HYPHEN),
            other => token.push(other),
        }
    }
    token
}

/// Decode a path token back into the station display name.
///
/// Reverses every substitution made by [`encode`], however many times it
/// occurs. A `-` that does not begin one of the escape sequences is rejected.
pub fn decode(token: &str) -> Result<String, InvalidToken> {
    let mut name = String::with_capacity(token.len());
    let mut rest = token;

    while let Some(idx) = rest.find('-') {
        name.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        let position = token.len() - tail.len();

        let (decoded, consumed) = if tail.starts_with(HYPHEN) {
            ('-', HYPHEN.len())
        } else if tail.starts_with(SLASH) {
            ('/', SLASH.len())
        } else if tail.starts_with(SHARP_S) {
            ('ß', SHARP_S.len())
        } else {
            return Err(InvalidToken {
                position,
                reason: "dangling '-' outside an escape sequence",
            });
        };

        name.push(decoded);
        rest = &tail[consumed..];
    }

    name.push_str(rest);
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_unchanged() {
        assert_eq!(encode("Stephansplatz"), "Stephansplatz");
        assert_eq!(decode("Stephansplatz").unwrap(), "Stephansplatz");
    }

    #[test]
    fn encodes_every_occurrence() {
        assert_eq!(encode("A/B/C"), "A-:-B-:-C");
        assert_eq!(encode("Großfeldsiedlung-Süß"), "Gro-ss-feldsiedlung--Sü-ss-");
    }

    #[test]
    fn decodes_every_occurrence() {
        assert_eq!(decode("A-:-B-:-C").unwrap(), "A/B/C");
        assert_eq!(decode("-ss--ss-").unwrap(), "ßß");
        assert_eq!(
            decode("Gro-ss-feldsiedlung--Sü-ss-").unwrap(),
            "Großfeldsiedlung-Süß"
        );
    }

    #[test]
    fn names_resembling_escapes_roundtrip() {
        for name in ["a-:/", "x-ss-", "-", "--", "-:-", "/ss-", "ß-:"] {
            assert_eq!(decode(&encode(name)).unwrap(), name, "name {name:?}");
        }
    }

    #[test]
    fn rejects_dangling_hyphen() {
        let err = decode("Wien Mitte-Landstraße").unwrap_err();
        assert_eq!(err.position, 10);

        assert!(decode("trailing-").is_err());
        assert!(decode("-s-").is_err());
    }
}
