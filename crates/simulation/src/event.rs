//! Trade events recorded during a run.
//!
//! Every position entry and exit is logged with the step, timestamp and price
//! at which it happened.

use chrono::{DateTime, Utc};
use pbt_domain::enums::{ExitReason, PositionSide};
use pbt_domain::value_objects::price::Price;
use rust_decimal::Decimal;
use serde::Serialize;

/// Types of events that can occur during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeEventType {
    /// Position was opened.
    PositionOpened,
    /// Position was closed.
    PositionClosed,
}

/// Event-specific data payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EventData {
    /// Position opened data.
    PositionOpened {
        /// Direction of the new position.
        side: PositionSide,
        /// Whole shares bought or sold short.
        shares: u64,
    },
    /// Position closed data.
    PositionClosed {
        /// Direction of the closed position.
        side: PositionSide,
        /// Price the position was opened at.
        entry_price: Price,
        /// Whole shares in the position.
        shares: u64,
        /// Realized profit or loss.
        pnl: Decimal,
        /// Exit condition that fired.
        reason: ExitReason,
    },
}

/// A trade event with full context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeEvent {
    /// Step (series index) when the event occurred.
    pub step: usize,
    /// Timestamp of the observation at that step.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: TradeEventType,
    /// Close price at the time of the event.
    pub price: Price,
    /// Additional event-specific data.
    pub data: EventData,
}

impl TradeEvent {
    /// Creates a new position opened event.
    #[must_use]
    pub fn position_opened(
        step: usize,
        timestamp: DateTime<Utc>,
        price: Price,
        side: PositionSide,
        shares: u64,
    ) -> Self {
        Self {
            step,
            timestamp,
            event_type: TradeEventType::PositionOpened,
            price,
            data: EventData::PositionOpened { side, shares },
        }
    }

    /// Creates a new position closed event.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn position_closed(
        step: usize,
        timestamp: DateTime<Utc>,
        price: Price,
        side: PositionSide,
        entry_price: Price,
        shares: u64,
        pnl: Decimal,
        reason: ExitReason,
    ) -> Self {
        Self {
            step,
            timestamp,
            event_type: TradeEventType::PositionClosed,
            price,
            data: EventData::PositionClosed {
                side,
                entry_price,
                shares,
                pnl,
                reason,
            },
        }
    }

    /// Exit reason for a close event.
    #[must_use]
    pub fn exit_reason(&self) -> Option<ExitReason> {
        match self.data {
            EventData::PositionClosed { reason, .. } => Some(reason),
            EventData::PositionOpened { .. } => None,
        }
    }
}

/// Event log for collecting all events during a run.
#[derive(Debug, Default)]
pub struct EventLog {
    /// All recorded events.
    events: Vec<TradeEvent>,
}

impl EventLog {
    /// Creates a new empty event log.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Records an event.
    pub fn record(&mut self, event: TradeEvent) {
        self.events.push(event);
    }

    /// Returns all events.
    #[must_use]
    pub fn events(&self) -> &[TradeEvent] {
        &self.events
    }

    /// Consumes the log, returning the events in order.
    #[must_use]
    pub fn into_events(self) -> Vec<TradeEvent> {
        self.events
    }
}
