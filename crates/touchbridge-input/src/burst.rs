//! Event sequences for each kind of injection.
//!
//! Every builder returns a complete unit: evdev bursts end with
//! `SYN_REPORT`, keyboard sequences release every key they press.

use evdev::{AbsoluteAxisCode, EventType, KeyCode as EvdevKey, SynchronizationCode};
use touchbridge_types::{KeyRecord, RawEvent};

use crate::error::InputError;
use crate::keymap::ascii_to_keystroke;
use crate::Injection;

const EV_SYN: u16 = EventType::SYNCHRONIZATION.0;
const EV_KEY: u16 = EventType::KEY.0;
const EV_ABS: u16 = EventType::ABSOLUTE.0;

const SYN_REPORT: RawEvent = RawEvent::new(EV_SYN, SynchronizationCode::SYN_REPORT.0, 0);

fn key(code: EvdevKey, value: i32) -> RawEvent {
    RawEvent::new(EV_KEY, code.0, value)
}

fn abs(axis: AbsoluteAxisCode, value: i32) -> RawEvent {
    RawEvent::new(EV_ABS, axis.0, value)
}

/// Finger down at a panel position.
pub fn touch_down(x: i32, y: i32, pressure: i32) -> Vec<RawEvent> {
    vec![
        key(EvdevKey::BTN_TOUCH, 1),
        abs(AbsoluteAxisCode::ABS_X, x),
        abs(AbsoluteAxisCode::ABS_Y, y),
        abs(AbsoluteAxisCode::ABS_PRESSURE, pressure),
        SYN_REPORT,
    ]
}

/// Finger moved while down.
pub fn touch_move(x: i32, y: i32, pressure: i32) -> Vec<RawEvent> {
    vec![
        abs(AbsoluteAxisCode::ABS_X, x),
        abs(AbsoluteAxisCode::ABS_Y, y),
        abs(AbsoluteAxisCode::ABS_PRESSURE, pressure),
        SYN_REPORT,
    ]
}

/// Finger lifted. Position is not reported on release.
pub fn touch_up(pressure: i32) -> Vec<RawEvent> {
    vec![
        key(EvdevKey::BTN_TOUCH, 0),
        abs(AbsoluteAxisCode::ABS_PRESSURE, pressure),
        SYN_REPORT,
    ]
}

/// Press and release of one key, each half synchronized.
pub fn key_pulse(code: EvdevKey) -> Vec<RawEvent> {
    vec![key(code, 1), SYN_REPORT, key(code, 0), SYN_REPORT]
}

pub fn key_press(code: EvdevKey) -> Vec<RawEvent> {
    vec![key(code, 1), SYN_REPORT]
}

pub fn key_release(code: EvdevKey) -> Vec<RawEvent> {
    vec![key(code, 0), SYN_REPORT]
}

/// Press and release records for the virtual keyboard node.
///
/// The node takes one byte per key code, so codes above 255 are refused.
pub fn keyboard_pulse(code: u32) -> Result<Vec<KeyRecord>, InputError> {
    let key = u8::try_from(code).map_err(|_| InputError::KeyCodeOutOfRange(code))?;
    Ok(vec![KeyRecord::press(key), KeyRecord::release(key)])
}

/// Keyboard records typing `text`, one injection per character.
///
/// Capitals and shifted symbols are wrapped in a left-shift press and
/// release. Characters with no key on the layout are skipped.
pub fn text_injections(text: &str) -> Vec<Injection> {
    let Ok(shift) = u8::try_from(EvdevKey::KEY_LEFTSHIFT.0) else {
        return Vec::new();
    };

    text.chars()
        .filter_map(|c| {
            let stroke = ascii_to_keystroke(c)?;
            let key = u8::try_from(stroke.key.0).ok()?;
            let records = if stroke.shift {
                vec![
                    KeyRecord::press(shift),
                    KeyRecord::press(key),
                    KeyRecord::release(key),
                    KeyRecord::release(shift),
                ]
            } else {
                vec![KeyRecord::press(key), KeyRecord::release(key)]
            };
            Some(Injection::Keyboard(records))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn down_sets_touch_then_position() {
        let burst = touch_down(10, 20, 1);
        assert_eq!(burst.len(), 5);
        assert_eq!(burst[0], RawEvent::new(1, 0x14a, 1));
        assert_eq!(burst[1], RawEvent::new(3, 0x00, 10));
        assert_eq!(burst[2], RawEvent::new(3, 0x01, 20));
        assert_eq!(burst[3], RawEvent::new(3, 0x18, 1));
        assert_eq!(burst[4], SYN_REPORT);
    }

    #[test]
    fn move_has_no_button_event() {
        let burst = touch_move(1, 2, 3);
        assert!(burst.iter().all(|e| e.kind != EV_KEY));
        assert_eq!(burst.last(), Some(&SYN_REPORT));
    }

    #[test]
    fn up_clears_touch_without_position() {
        let burst = touch_up(0);
        assert_eq!(burst[0], RawEvent::new(1, 0x14a, 0));
        assert_eq!(burst[1], RawEvent::new(3, 0x18, 0));
        assert_eq!(burst.len(), 3);
    }

    #[test]
    fn pulse_syncs_each_half() {
        let burst = key_pulse(EvdevKey::KEY_BACK);
        assert_eq!(
            burst,
            vec![
                RawEvent::new(1, 158, 1),
                SYN_REPORT,
                RawEvent::new(1, 158, 0),
                SYN_REPORT,
            ]
        );
    }

    #[test]
    fn keyboard_pulse_rejects_wide_codes() {
        assert_eq!(
            keyboard_pulse(172).unwrap(),
            vec![KeyRecord::press(172), KeyRecord::release(172)]
        );
        assert!(matches!(
            keyboard_pulse(256),
            Err(InputError::KeyCodeOutOfRange(256))
        ));
    }

    #[test]
    fn text_wraps_capitals_in_shift() {
        let injections = text_injections("aB");
        assert_eq!(injections.len(), 2);
        assert_eq!(
            injections[0],
            Injection::Keyboard(vec![KeyRecord::press(30), KeyRecord::release(30)])
        );
        assert_eq!(
            injections[1],
            Injection::Keyboard(vec![
                KeyRecord::press(42),
                KeyRecord::press(48),
                KeyRecord::release(48),
                KeyRecord::release(42),
            ])
        );
    }

    #[test]
    fn text_skips_unmapped_characters() {
        assert_eq!(text_injections("é€").len(), 0);
        assert_eq!(text_injections("a€b").len(), 2);
    }
}
