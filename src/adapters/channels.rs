//! Chat transport ↔ control loop channels.
//!
//! Uses `embassy-sync` bounded channels to bridge the messaging transport
//! (its own task) with the synchronous control loop. This is the only
//! place where messages cross between the two; the control loop never
//! blocks on either side.
//!
//! ```text
//! ┌──────────────┐ InboundMessage  ┌──────────────┐
//! │  Transport   │───────────────▶│ Control Loop │
//! │  task        │◀───────────────│ (AppService) │
//! └──────────────┘ OutboundMessage └──────────────┘
//! ```
//!
//! A full outbox drops the message; delivery is best-effort.

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::events::Notification;
use crate::app::ports::{CommandChannel, InboundMessage, NotificationSink};
use crate::error::CommsError;

/// Rendered notification text, ready for the transport.
pub type OutboundMessage = heapless::String<256>;

/// Channel depth for inbound (user → device) messages.
pub const INBOX_DEPTH: usize = 8;

/// Channel depth for outbound (device → user) messages.
pub const OUTBOX_DEPTH: usize = 8;

pub type Inbox = Channel<CriticalSectionRawMutex, InboundMessage, INBOX_DEPTH>;
pub type Outbox = Channel<CriticalSectionRawMutex, OutboundMessage, OUTBOX_DEPTH>;

/// Inbound channel: transport task → control loop.
pub static INBOX: Inbox = Channel::new();

/// Outbound channel: control loop → transport task.
pub static OUTBOX: Outbox = Channel::new();

// ── Control-loop side ─────────────────────────────────────────

/// [`CommandChannel`] backed by an inbox channel.
pub struct ChannelCommandSource<'a> {
    inbox: &'a Inbox,
}

impl<'a> ChannelCommandSource<'a> {
    pub fn new(inbox: &'a Inbox) -> Self {
        Self { inbox }
    }
}

impl CommandChannel for ChannelCommandSource<'_> {
    fn poll(&mut self) -> Option<InboundMessage> {
        self.inbox.try_receive().ok()
    }
}

/// [`NotificationSink`] that renders each notification and queues it on
/// an outbox channel.
pub struct ChannelNotificationSink<'a> {
    outbox: &'a Outbox,
    dropped: u32,
}

impl<'a> ChannelNotificationSink<'a> {
    pub fn new(outbox: &'a Outbox) -> Self {
        Self { outbox, dropped: 0 }
    }

    /// Messages dropped because they did not fit or the outbox was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl NotificationSink for ChannelNotificationSink<'_> {
    fn notify(&mut self, notification: &Notification) -> Result<(), CommsError> {
        let mut text = OutboundMessage::new();
        let queued = write!(text, "{notification}")
            .ok()
            .and_then(|()| self.outbox.try_send(text).ok());
        if queued.is_none() {
            self.dropped = self.dropped.saturating_add(1);
            return Err(CommsError::SendFailed);
        }
        Ok(())
    }
}

// ── Transport side ────────────────────────────────────────────

/// Queue a message received by the transport. Returns `false` (and drops
/// the message) when the inbox is full.
pub fn deliver_inbound(inbox: &Inbox, sender: &str, text: &str) -> bool {
    inbox.try_send(InboundMessage::new(sender, text)).is_ok()
}

/// Next rendered notification for the transport to send, if any.
pub fn next_outbound(outbox: &Outbox) -> Option<OutboundMessage> {
    outbox.try_receive().ok()
}
