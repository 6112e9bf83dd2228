//! Integration tests for session timing blocks.

use std::sync::{Arc, Mutex};

use jiff::{SignedDuration, Zoned};
use tintlog::{Logger, ManualClock, MemorySink, Session};

#[test]
fn checkpoints_report_elapsed_since_first() {
    let start: Zoned = "2026-07-21T08:00:00[UTC]".parse().unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let console = MemorySink::new();
    let mut logger = Logger::new()
        .with_sink(console.clone())
        .with_clock(clock.clone())
        .with_color(false);
    logger.set_format("");
    let logger = Mutex::new(logger);

    {
        let mut session = Session::with_logger(&logger);
        session.append(&[&"connect"]);
        clock.advance(SignedDuration::from_millis(40));
        session.append(&[&"handshake"]);
        clock.advance(SignedDuration::from_secs(2));
        session.append(&[&"ready", &3, &"peers"]);
    }

    assert_eq!(
        console.contents(),
        "\n\t2026-07-21 08:00:00 > connect\n\t40ms       > handshake\n\t2.04s      > ready 3 peers\n"
    );
}
