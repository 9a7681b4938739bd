//! Byte encoding of injections.
//!
//! Evdev nodes take `struct input_event` records: a `timeval` followed by
//! type, code and value. The timestamp is written as zero and filled in by
//! the kernel.

use std::mem::size_of;

use touchbridge_types::{KeyRecord, RawEvent};

use crate::Injection;

/// Size of one kernel `input_event` on this target.
pub const EVENT_SIZE: usize =
    size_of::<libc::time_t>() + size_of::<libc::suseconds_t>() + 2 + 2 + 4;

/// Encode events as consecutive `input_event` records.
pub fn encode_events(events: &[RawEvent]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(events.len() * EVENT_SIZE);
    for event in events {
        let sec: libc::time_t = 0;
        let usec: libc::suseconds_t = 0;
        buf.extend_from_slice(&sec.to_ne_bytes());
        buf.extend_from_slice(&usec.to_ne_bytes());
        buf.extend_from_slice(&event.kind.to_ne_bytes());
        buf.extend_from_slice(&event.code.to_ne_bytes());
        buf.extend_from_slice(&event.value.to_ne_bytes());
    }
    buf
}

fn encode_key_records(records: &[KeyRecord]) -> Vec<u8> {
    records.iter().flat_map(KeyRecord::to_bytes).collect()
}

impl Injection {
    /// Encode the whole injection into one buffer.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Touch(events) | Self::AuxKey(events) => encode_events(events),
            Self::Mouse(record) => record.to_bytes().to_vec(),
            Self::Keyboard(records) => encode_key_records(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchbridge_types::MouseRecord;

    #[test]
    fn event_size_matches_kernel_struct() {
        assert_eq!(EVENT_SIZE, size_of::<libc::input_event>());
    }

    #[test]
    fn events_are_laid_out_in_order() {
        let bytes = encode_events(&[RawEvent::new(3, 0, 1234), RawEvent::new(0, 0, 0)]);
        assert_eq!(bytes.len(), 2 * EVENT_SIZE);

        let head = size_of::<libc::time_t>() + size_of::<libc::suseconds_t>();
        let first = &bytes[..EVENT_SIZE];
        assert!(first[..head].iter().all(|&b| b == 0));
        assert_eq!(u16::from_ne_bytes([first[head], first[head + 1]]), 3);
        assert_eq!(u16::from_ne_bytes([first[head + 2], first[head + 3]]), 0);
        assert_eq!(
            i32::from_ne_bytes(first[head + 4..head + 8].try_into().unwrap()),
            1234
        );
    }

    #[test]
    fn records_encode_compactly() {
        let mouse = Injection::Mouse(MouseRecord { kind: 1, x: 2, y: 3 });
        assert_eq!(mouse.encode().len(), MouseRecord::SIZE);

        let keys = Injection::Keyboard(vec![KeyRecord::press(42), KeyRecord::release(42)]);
        assert_eq!(keys.encode(), vec![42, 1, 42, 0]);
    }
}
