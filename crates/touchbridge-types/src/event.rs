//! Raw input event and companion-node record types.

/// One kernel input event: type, code, value.
///
/// The timestamp is left to the kernel, so it is not carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    #[must_use]
    pub const fn new(kind: u16, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }
}

/// A record for the virtual mouse node: 1-byte type and two 4-byte integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseRecord {
    pub kind: u8,
    pub x: i32,
    pub y: i32,
}

impl MouseRecord {
    /// Size of the encoded record in bytes.
    pub const SIZE: usize = 9;

    /// Encode as packed native-endian bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0] = self.kind;
        buf[1..5].copy_from_slice(&self.x.to_ne_bytes());
        buf[5..9].copy_from_slice(&self.y.to_ne_bytes());
        buf
    }
}

/// A record for the virtual keyboard node: key code and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    pub key: u8,
    /// 1 = press, 0 = release.
    pub value: u8,
}

impl KeyRecord {
    pub const SIZE: usize = 2;

    #[must_use]
    pub const fn press(key: u8) -> Self {
        Self { key, value: 1 }
    }

    #[must_use]
    pub const fn release(key: u8) -> Self {
        Self { key, value: 0 }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        [self.key, self.value]
    }
}
