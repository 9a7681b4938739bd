//! Typed commands parsed from control channel lines.
//!
//! The first character of a line is the opcode; arguments follow after one
//! separator character. Numeric arguments that fail to parse read as zero,
//! except for the mock-location command which rejects short input.

use std::str::FromStr;

use crate::error::ProtocolError;

/// Phase of a single-contact touch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
}

/// Which kind of component a launch request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchKind {
    /// Start an activity (`I`).
    Activity,
    /// Send a broadcast (`b`).
    Broadcast,
    /// Start a service (`s`).
    Service,
}

impl LaunchKind {
    /// Activity-manager subcommand for this kind.
    pub fn subcommand(self) -> &'static str {
        match self {
            Self::Activity => "start",
            Self::Broadcast => "broadcast",
            Self::Service => "startservice",
        }
    }
}

/// Request to launch an external component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub kind: LaunchKind,
    pub action: String,
    pub package: String,
    pub activity: String,
    /// Raw extras string passed through untouched.
    pub extras: String,
}

/// A mock location fix.
#[derive(Debug, Clone, PartialEq)]
pub struct MockLocation {
    pub provider: String,
    pub time: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub accuracy: f32,
    pub bearing: f32,
    pub speed: f32,
}

/// A parsed control command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `d height width`: declare the client canvas.
    Canvas { height: u32, width: u32 },
    /// `D`/`M`/`U x y pressure`.
    Touch {
        phase: TouchPhase,
        x: f64,
        y: f64,
        pressure: f64,
    },
    /// `B`: back key pulse.
    Back,
    /// `w`: power key press.
    PowerPress,
    /// `W`: power key release.
    PowerRelease,
    /// `H`: home key pulse.
    Home,
    /// `O [keycode]`: system key event; `None` selects the configured default.
    SystemKey { code: Option<u32> },
    /// `k text`: type a string.
    Text(String),
    /// `v keycode`: press and release a keyboard key.
    Key { code: u32 },
    /// `m type x y`: raw mouse record.
    Mouse { kind: u8, x: i32, y: i32 },
    /// `L ...`: mock location broadcast.
    Location(MockLocation),
    /// `P level`: set backlight brightness, clamped to 0..=255.
    SetBrightness(u8),
    /// `G`: read backlight brightness.
    GetBrightness,
    /// `S`: read battery level and charging state.
    Battery,
    /// `I`/`b`/`s action package activity [extras]`.
    Launch(LaunchRequest),
}

impl Command {
    /// Parse one line (without its newline).
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let mut chars = line.chars();
        let opcode = chars.next().ok_or(ProtocolError::Empty)?;
        let rest = chars.as_str();
        let args = rest
            .char_indices()
            .nth(1)
            .map_or("", |(idx, _)| &rest[idx..]);
        let mut fields = args.split_whitespace();

        let command = match opcode {
            'd' => Self::Canvas {
                height: scalar(&mut fields),
                width: scalar(&mut fields),
            },
            'D' => touch(TouchPhase::Down, &mut fields),
            'M' => touch(TouchPhase::Move, &mut fields),
            'U' => touch(TouchPhase::Up, &mut fields),
            'B' => Self::Back,
            'w' => Self::PowerPress,
            'W' => Self::PowerRelease,
            'H' => Self::Home,
            'O' => Self::SystemKey {
                code: fields.next().and_then(|f| f.parse().ok()),
            },
            'k' => Self::Text(args.to_string()),
            'v' => Self::Key {
                code: scalar(&mut fields),
            },
            'm' => Self::Mouse {
                kind: scalar(&mut fields),
                x: scalar(&mut fields),
                y: scalar(&mut fields),
            },
            'L' => Self::Location(location(&mut fields)?),
            'P' => {
                let level: i64 = scalar(&mut fields);
                Self::SetBrightness(u8::try_from(level.clamp(0, 255)).unwrap_or(u8::MAX))
            }
            'G' => Self::GetBrightness,
            'S' => Self::Battery,
            'I' => Self::Launch(launch(LaunchKind::Activity, args)),
            'b' => Self::Launch(launch(LaunchKind::Broadcast, args)),
            's' => Self::Launch(launch(LaunchKind::Service, args)),
            other => return Err(ProtocolError::UnknownOpcode(other)),
        };
        Ok(command)
    }

    /// Whether this command produces a reply line.
    pub fn expects_reply(&self) -> bool {
        matches!(
            self,
            Self::SetBrightness(_) | Self::GetBrightness | Self::Battery
        )
    }
}

/// Next field parsed as `T`, or `T::default()` if missing or malformed.
fn scalar<'a, T, I>(fields: &mut I) -> T
where
    T: FromStr + Default,
    I: Iterator<Item = &'a str>,
{
    fields
        .next()
        .and_then(|f| f.parse().ok())
        .unwrap_or_default()
}

fn touch<'a>(phase: TouchPhase, fields: &mut impl Iterator<Item = &'a str>) -> Command {
    Command::Touch {
        phase,
        x: scalar(fields),
        y: scalar(fields),
        pressure: scalar(fields),
    }
}

const LOCATION_FIELDS: usize = 8;

fn location<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Result<MockLocation, ProtocolError> {
    let mut found = 0;
    let short = |found| ProtocolError::MissingFields {
        opcode: 'L',
        expected: LOCATION_FIELDS,
        found,
    };

    // Fields count in order; parsing stops at the first one that is missing
    // or malformed.
    let provider = fields.next().ok_or_else(|| short(found))?.to_string();
    found += 1;
    let time = strict(fields).ok_or_else(|| short(found))?;
    found += 1;
    let latitude = strict(fields).ok_or_else(|| short(found))?;
    found += 1;
    let longitude = strict(fields).ok_or_else(|| short(found))?;
    found += 1;
    let altitude = strict(fields).ok_or_else(|| short(found))?;
    found += 1;
    let accuracy = strict(fields).ok_or_else(|| short(found))?;
    found += 1;
    let bearing = strict(fields).ok_or_else(|| short(found))?;
    found += 1;
    let speed = strict(fields).ok_or_else(|| short(found))?;

    Ok(MockLocation {
        provider,
        time,
        latitude,
        longitude,
        altitude,
        accuracy,
        bearing,
        speed,
    })
}

fn strict<'a, T: FromStr>(fields: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    fields.next().and_then(|f| f.parse().ok())
}

/// Split `action package activity` off the front; the rest is extras.
fn launch(kind: LaunchKind, args: &str) -> LaunchRequest {
    let mut rest = args;
    let mut take = || {
        let trimmed = rest.trim_start();
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (field, tail) = trimmed.split_at(end);
        rest = tail;
        field.to_string()
    };
    let action = take();
    let package = take();
    let activity = take();
    LaunchRequest {
        kind,
        action,
        package,
        activity,
        extras: rest.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_touch_phases() {
        assert_eq!(
            Command::parse("D 0.5 0.25 1").unwrap(),
            Command::Touch {
                phase: TouchPhase::Down,
                x: 0.5,
                y: 0.25,
                pressure: 1.0
            }
        );
        assert!(matches!(
            Command::parse("U 1 2 0").unwrap(),
            Command::Touch {
                phase: TouchPhase::Up,
                ..
            }
        ));
    }

    #[test]
    fn malformed_numbers_read_as_zero() {
        assert_eq!(
            Command::parse("M abc 12 x").unwrap(),
            Command::Touch {
                phase: TouchPhase::Move,
                x: 0.0,
                y: 12.0,
                pressure: 0.0
            }
        );
        assert_eq!(
            Command::parse("d").unwrap(),
            Command::Canvas {
                height: 0,
                width: 0
            }
        );
    }

    #[test]
    fn canvas_is_height_then_width() {
        assert_eq!(
            Command::parse("d 480 800").unwrap(),
            Command::Canvas {
                height: 480,
                width: 800
            }
        );
    }

    #[test]
    fn text_keeps_spaces() {
        assert_eq!(
            Command::parse("k Hello, World!").unwrap(),
            Command::Text("Hello, World!".to_string())
        );
        assert_eq!(Command::parse("k").unwrap(), Command::Text(String::new()));
    }

    #[test]
    fn system_key_default_is_none() {
        assert_eq!(
            Command::parse("O").unwrap(),
            Command::SystemKey { code: None }
        );
        assert_eq!(
            Command::parse("O 4").unwrap(),
            Command::SystemKey { code: Some(4) }
        );
    }

    #[test]
    fn mouse_record_fields() {
        assert_eq!(
            Command::parse("m 1 -10 25").unwrap(),
            Command::Mouse {
                kind: 1,
                x: -10,
                y: 25
            }
        );
    }

    #[test]
    fn brightness_is_clamped() {
        assert_eq!(
            Command::parse("P 128").unwrap(),
            Command::SetBrightness(128)
        );
        assert_eq!(
            Command::parse("P 999").unwrap(),
            Command::SetBrightness(255)
        );
        assert_eq!(Command::parse("P -3").unwrap(), Command::SetBrightness(0));
    }

    #[test]
    fn location_with_eight_fields() {
        let cmd = Command::parse("L gps 1700000000 51.5 -0.12 11.0 3.5 90 1.25").unwrap();
        match cmd {
            Command::Location(fix) => {
                assert_eq!(fix.provider, "gps");
                assert_eq!(fix.time, 1_700_000_000);
                assert!((fix.latitude - 51.5).abs() < f64::EPSILON);
                assert!((fix.speed - 1.25).abs() < f32::EPSILON);
            }
            other => panic!("expected Location, got {other:?}"),
        }
    }

    #[test]
    fn location_with_seven_fields_is_rejected() {
        assert_eq!(
            Command::parse("L gps 1700000000 51.5 -0.12 11.0 3.5 90"),
            Err(ProtocolError::MissingFields {
                opcode: 'L',
                expected: 8,
                found: 7
            })
        );
    }

    #[test]
    fn location_stops_at_malformed_field() {
        assert_eq!(
            Command::parse("L gps soon 51.5 -0.12 11.0 3.5 90 1"),
            Err(ProtocolError::MissingFields {
                opcode: 'L',
                expected: 8,
                found: 1
            })
        );
    }

    #[test]
    fn launch_splits_extras() {
        assert_eq!(
            Command::parse("I android.intent.action.MAIN com.example .Main --ez debug true")
                .unwrap(),
            Command::Launch(LaunchRequest {
                kind: LaunchKind::Activity,
                action: "android.intent.action.MAIN".to_string(),
                package: "com.example".to_string(),
                activity: ".Main".to_string(),
                extras: "--ez debug true".to_string(),
            })
        );
    }

    #[test]
    fn launch_kinds() {
        assert!(matches!(
            Command::parse("b a p c").unwrap(),
            Command::Launch(LaunchRequest {
                kind: LaunchKind::Broadcast,
                ..
            })
        ));
        assert!(matches!(
            Command::parse("s a p c").unwrap(),
            Command::Launch(LaunchRequest {
                kind: LaunchKind::Service,
                ..
            })
        ));
    }

    #[test]
    fn replies_only_for_queries() {
        assert!(Command::parse("G").unwrap().expects_reply());
        assert!(Command::parse("S").unwrap().expects_reply());
        assert!(Command::parse("P 1").unwrap().expects_reply());
        assert!(!Command::parse("B").unwrap().expects_reply());
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert_eq!(
            Command::parse("Z"),
            Err(ProtocolError::UnknownOpcode('Z'))
        );
        assert_eq!(Command::parse(""), Err(ProtocolError::Empty));
    }
}
