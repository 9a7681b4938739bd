//! Integration test: reassembly does not depend on how reads are chunked.

use touchbridge_protocol::{Command, LineFramer, ProtocolError, TouchPhase};

fn feed(stream: &[u8], chunk: usize) -> (Vec<String>, usize) {
    let mut framer = LineFramer::default();
    let mut lines = Vec::new();
    for piece in stream.chunks(chunk) {
        framer.push(piece);
        while let Some(line) = framer.pop_line() {
            lines.push(String::from_utf8(line).unwrap());
        }
    }
    (lines, framer.pending())
}

#[test]
fn any_chunking_yields_the_same_lines() {
    let stream = b"A\nB\nC";
    for chunk in 1..=stream.len() {
        let (lines, pending) = feed(stream, chunk);
        assert_eq!(lines, vec!["A", "B"], "chunk size {chunk}");
        assert_eq!(pending, 1, "chunk size {chunk}");
    }
}

#[test]
fn gesture_split_mid_number() {
    let stream = b"d 480 800\nD 10 20 1\nM 11 21 1\nU 11 21 0\n";
    let (one_byte, _) = feed(stream, 1);
    let (whole, _) = feed(stream, stream.len());
    assert_eq!(one_byte, whole);

    let commands: Vec<Command> = whole
        .iter()
        .map(|line| Command::parse(line).unwrap())
        .collect();
    assert_eq!(
        commands[0],
        Command::Canvas {
            height: 480,
            width: 800
        }
    );
    assert!(matches!(
        commands[3],
        Command::Touch {
            phase: TouchPhase::Up,
            ..
        }
    ));
}

#[test]
fn oversized_partial_line_is_dropped_and_stream_recovers() {
    let mut framer = LineFramer::new(512);
    for _ in 0..3 {
        framer.push(&[b'x'; 400]);
    }
    assert!(framer.pending() < framer.capacity());
    framer.push(b"\nG\n");

    // Whatever survived of the garbage is one bogus line; the next is intact.
    let first = framer.pop_line().unwrap();
    assert!(first.iter().all(|&b| b == b'x'));
    assert!(matches!(
        Command::parse(std::str::from_utf8(&first).unwrap()),
        Err(ProtocolError::UnknownOpcode('x'))
    ));
    assert_eq!(framer.pop_line().unwrap(), b"G");
}
