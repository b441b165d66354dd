//! Fuzz target: inbound message parsing
//!
//! Feeds arbitrary text through message construction, command parsing and
//! the provisioning-reply parser. None of them may panic, and any accepted
//! warmup must be positive and appear in the text.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use gaswatch::app::commands::{Command, parse_warmup_minutes};
use gaswatch::app::ports::InboundMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let msg = InboundMessage::new(text, text);
    assert!(msg.sender.len() <= 32);
    assert!(msg.text.len() <= 128);

    let _ = Command::parse(&msg.text);

    if let Some(minutes) = parse_warmup_minutes(&msg.text) {
        assert!(minutes > 0);
        assert!(msg.text.contains(minutes.to_string().as_str()));
    }
});
