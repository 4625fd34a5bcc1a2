use chrono::{NaiveDate, NaiveTime};
use regex::bytes::{Captures, Regex};
use thiserror::Error;

use crate::value_objects::PlayerId;

// Byte patterns: player names may be in a legacy code page, so `.` must match any byte.
const SESSION_START_PATTERN: &str =
    r"(?-u)AdminLog started on (?P<date>\S+) at (?P<time>\S+)";
const KILL_PATTERN: &str = r#"(?-u)^(?P<time>[^|]+?) \| Player "(?P<killed_name>.+)"\(id=(?P<killed_id>[^)]*)\) has been killed by player "(?P<killer_name>.+)"\(id=(?P<killer_id>[^)]*)\)"#;
const DAMAGE_PATTERN: &str = r#"(?-u)^(?P<time>[^|]+?) \| "(?P<dealer_name>.+)\(uid=(?P<dealer_id>[^)]*)\) (?P<verb>HIT|SHOT) (?P<receiver_name>.+)\(uid=(?P<receiver_id>[^)]*)\) by (?P<weapon>.+) into (?P<body_part>.+)\.""#;

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageVerb {
    Hit,
    Shot,
}

/// A player as printed on a line: numeric id plus undecoded name bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerMention<'a> {
    pub id: PlayerId,
    pub raw_name: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine<'a> {
    SessionStart {
        date: NaiveDate,
        time: NaiveTime,
    },
    Kill {
        time: NaiveTime,
        killed: PlayerMention<'a>,
        killer: PlayerMention<'a>,
    },
    Damage {
        time: NaiveTime,
        dealer: PlayerMention<'a>,
        receiver: PlayerMention<'a>,
        verb: DamageVerb,
        weapon_label: String,
        body_part_label: String,
    },
    Unrecognized,
}


/// Why a line that matched a known shape could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("invalid {field} '{value}'")]
    InvalidId { field: &'static str, value: String },
    #[error("invalid time '{0}'")]
    InvalidTime(String),
    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

#[derive(Debug, Clone)]
pub struct LineClassifier {
    session_start: Regex,
    kill: Regex,
    damage: Regex,
}

impl LineClassifier {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            session_start: Regex::new(SESSION_START_PATTERN)?,
            kill: Regex::new(KILL_PATTERN)?,
            damage: Regex::new(DAMAGE_PATTERN)?,
        })
    }

    /// First matching shape wins: session start, kill, damage.
    pub fn classify<'a>(&self, line: &'a [u8]) -> Result<LogLine<'a>, LineError> {
        if let Some(caps) = self.session_start.captures(line) {
            let date_text = text(&caps, "date");
            let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT)
                .map_err(|_| LineError::InvalidDate(date_text.clone()))?;
            let time = parse_time(&text(&caps, "time"))?;
            return Ok(LogLine::SessionStart { date, time });
        }

        if let Some(caps) = self.kill.captures(line) {
            let time = parse_time(&text(&caps, "time"))?;
            let killed = mention(&caps, "killed_name", "killed_id")?;
            let killer = mention(&caps, "killer_name", "killer_id")?;
            return Ok(LogLine::Kill {
                time,
                killed,
                killer,
            });
        }

        if let Some(caps) = self.damage.captures(line) {
            let time = parse_time(&text(&caps, "time"))?;
            let dealer = mention(&caps, "dealer_name", "dealer_id")?;
            let receiver = mention(&caps, "receiver_name", "receiver_id")?;
            let verb = match bytes(&caps, "verb") {
                b"SHOT" => DamageVerb::Shot,
                _ => DamageVerb::Hit,
            };
            return Ok(LogLine::Damage {
                time,
                dealer,
                receiver,
                verb,
                weapon_label: text(&caps, "weapon"),
                body_part_label: text(&caps, "body_part"),
            });
        }

        Ok(LogLine::Unrecognized)
    }

    /// Time prefix (`HH:MM:SS | ...`) of any line, recognized or not.
    pub fn leading_time(&self, line: &[u8]) -> Option<NaiveTime> {
        let end = line.windows(2).position(|pair| pair == b" |")?;
        let prefix = std::str::from_utf8(&line[..end]).ok()?;
        parse_time(prefix).ok()
    }
}

fn bytes<'a>(caps: &Captures<'a>, name: &str) -> &'a [u8] {
    caps.name(name).map(|m| m.as_bytes()).unwrap_or_default()
}

fn text(caps: &Captures<'_>, name: &str) -> String {
    String::from_utf8_lossy(bytes(caps, name)).into_owned()
}

fn mention<'a>(
    caps: &Captures<'a>,
    name_group: &'static str,
    id_group: &'static str,
) -> Result<PlayerMention<'a>, LineError> {
    let raw_id = text(caps, id_group);
    let id = raw_id
        .trim()
        .parse::<i64>()
        .map_err(|_| LineError::InvalidId {
            field: id_group,
            value: raw_id.clone(),
        })?;
    Ok(PlayerMention {
        id: PlayerId(id),
        raw_name: bytes(caps, name_group),
    })
}

fn parse_time(value: &str) -> Result<NaiveTime, LineError> {
    let trimmed = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| LineError::InvalidTime(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier {
        LineClassifier::new().expect("patterns compile")
    }

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).expect("time")
    }

    #[test]
    fn classifies_session_start() {
        let line = classifier()
            .classify(b"AdminLog started on 2019-01-10 at 13:51:16")
            .expect("classify");
        assert_eq!(
            line,
            LogLine::SessionStart {
                date: NaiveDate::from_ymd_opt(2019, 1, 10).expect("date"),
                time: hms(13, 51, 16),
            }
        );
    }

    #[test]
    fn classifies_kill_line() {
        let raw = br#"14:02:11 | Player "Bob"(id=12345) has been killed by player "Alice"(id=67890)"#;
        match classifier().classify(raw).expect("classify") {
            LogLine::Kill {
                time,
                killed,
                killer,
            } => {
                assert_eq!(time, hms(14, 2, 11));
                assert_eq!(killed.id, PlayerId(12345));
                assert_eq!(killed.raw_name, b"Bob");
                assert_eq!(killer.id, PlayerId(67890));
                assert_eq!(killer.raw_name, b"Alice");
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn hit_and_shot_share_one_shape() {
        let hit = br#"14:02:10 | "Alice(uid=67890) HIT Bob(uid=12345) by M4A1 into Head.""#;
        let shot = br#"14:02:10 | "Alice(uid=67890) SHOT Bob(uid=12345) by M4A1 into Head.""#;
        for (raw, expected) in [(&hit[..], DamageVerb::Hit), (&shot[..], DamageVerb::Shot)] {
            match classifier().classify(raw).expect("classify") {
                LogLine::Damage {
                    dealer,
                    receiver,
                    verb,
                    weapon_label,
                    body_part_label,
                    ..
                } => {
                    assert_eq!(dealer.id, PlayerId(67890));
                    assert_eq!(receiver.id, PlayerId(12345));
                    assert_eq!(receiver.raw_name, b"Bob");
                    assert_eq!(verb, expected);
                    assert_eq!(weapon_label, "M4A1");
                    assert_eq!(body_part_label, "Head");
                }
                other => panic!("unexpected classification: {:?}", other),
            }
        }
    }

    #[test]
    fn damage_line_with_trailing_text_still_matches() {
        let classifier = classifier();
        for raw in [
            &br#"14:02:10 | "Alice(uid=67890) HIT Bob(uid=12345) by M4A1 into Head." "#[..],
            &br#"14:02:10 | "Alice(uid=67890) SHOT Bob(uid=12345) by M4A1 into Left Leg." (dmg 12)"#[..],
        ] {
            match classifier.classify(raw).expect("classify") {
                LogLine::Damage {
                    weapon_label,
                    body_part_label,
                    ..
                } => {
                    assert_eq!(weapon_label, "M4A1");
                    assert!(body_part_label == "Head" || body_part_label == "Left Leg");
                }
                other => panic!("unexpected classification: {:?}", other),
            }
        }
    }

    #[test]
    fn legacy_encoded_names_are_captured_as_bytes() {
        let mut raw = b"10:00:00 | Player \"".to_vec();
        raw.extend_from_slice(&[0xC8, 0xE2, 0xE0, 0xED]);
        raw.extend_from_slice(b"\"(id=42) has been killed by player \"Alice\"(id=7)");
        match classifier().classify(&raw).expect("classify") {
            LogLine::Kill { killed, .. } => {
                assert_eq!(killed.raw_name, &[0xC8, 0xE2, 0xE0, 0xED]);
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn bad_id_is_reported() {
        let raw = br#"14:02:11 | Player "Bob"(id=abc) has been killed by player "Alice"(id=67890)"#;
        let err = classifier().classify(raw).expect_err("bad id");
        assert_eq!(
            err,
            LineError::InvalidId {
                field: "killed_id",
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn bad_time_is_reported() {
        let raw = br#"25:99:00 | Player "Bob"(id=1) has been killed by player "Alice"(id=2)"#;
        assert!(matches!(
            classifier().classify(raw),
            Err(LineError::InvalidTime(_))
        ));
    }

    #[test]
    fn unknown_lines_are_unrecognized() {
        let line = classifier()
            .classify(br#"14:00:00 | Player "Bob" is connected (id=1)"#)
            .expect("classify");
        assert_eq!(line, LogLine::Unrecognized);
    }

    #[test]
    fn leading_time_reads_any_timestamped_line() {
        let classifier = classifier();
        assert_eq!(
            classifier.leading_time(br#"14:00:00 | Player "Bob" is connected (id=1)"#),
            Some(hms(14, 0, 0))
        );
        assert_eq!(classifier.leading_time(b"no time here"), None);
    }
}
