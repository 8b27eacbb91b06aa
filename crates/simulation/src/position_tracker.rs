//! Position state machine for a single run.
//!
//! The tracker owns the running balance, the (at most one) open position and
//! the trade counters. A run is always in exactly one of [`StrategyState`]'s
//! states: positions are only opened from `Flat` and closing always returns
//! to `Flat`.

use crate::event::{EventLog, TradeEvent};
use chrono::{DateTime, Utc};
use pbt_domain::entities::position::Position;
use pbt_domain::enums::{ExitReason, PositionSide};
use pbt_domain::value_objects::price::Price;
use rust_decimal::Decimal;
use tracing::trace;

/// Position state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyState {
    /// No open position.
    Flat,
    /// Holding a long position.
    Long,
    /// Holding a short position.
    Short,
}

/// A completed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedTrade {
    /// Direction of the trade.
    pub side: PositionSide,
    /// Entry price.
    pub entry_price: Price,
    /// Exit price.
    pub exit_price: Price,
    /// Whole shares traded.
    pub shares: u64,
    /// Realized profit or loss.
    pub pnl: Decimal,
    /// Exit condition that closed the trade.
    pub reason: ExitReason,
}

impl ClosedTrade {
    /// A trade wins when the exit price moved in its favor.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        match self.side {
            PositionSide::Long => self.exit_price > self.entry_price,
            PositionSide::Short => self.exit_price < self.entry_price,
        }
    }
}

/// Tracks balance, open position and trade statistics through a run.
#[derive(Debug)]
pub struct PositionTracker {
    /// Running account balance (realized only).
    balance: Decimal,
    /// Currently open position.
    position: Option<Position>,
    /// Sum of realized profit and loss.
    total_profit: Decimal,
    /// Completed trades.
    trade_count: u32,
    /// Completed trades with a favorable exit.
    winning_trade_count: u32,
    /// Entry and exit log.
    events: EventLog,
}

impl PositionTracker {
    /// Creates a flat tracker holding `initial_balance`.
    #[must_use]
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            balance: initial_balance,
            position: None,
            total_profit: Decimal::ZERO,
            trade_count: 0,
            winning_trade_count: 0,
            events: EventLog::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> StrategyState {
        match self.position {
            None => StrategyState::Flat,
            Some(Position {
                side: PositionSide::Long,
                ..
            }) => StrategyState::Long,
            Some(Position {
                side: PositionSide::Short,
                ..
            }) => StrategyState::Short,
        }
    }

    /// The open position, if any.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Running balance.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Sum of realized profit and loss.
    #[must_use]
    pub fn total_profit(&self) -> Decimal {
        self.total_profit
    }

    /// Number of completed trades.
    #[must_use]
    pub fn trade_count(&self) -> u32 {
        self.trade_count
    }

    /// Number of completed trades that won.
    #[must_use]
    pub fn winning_trade_count(&self) -> u32 {
        self.winning_trade_count
    }

    /// Recorded events.
    #[must_use]
    pub fn events(&self) -> &[TradeEvent] {
        self.events.events()
    }

    /// Opens a position. Only valid from `Flat`.
    ///
    /// Returns `false` and leaves the state untouched if a position is
    /// already open. Opening realizes nothing.
    pub fn open(
        &mut self,
        step: usize,
        timestamp: DateTime<Utc>,
        side: PositionSide,
        price: Price,
        shares: u64,
    ) -> bool {
        if self.position.is_some() {
            return false;
        }
        trace!(step, %side, %price, shares, "opening position");
        self.position = Some(Position::new(side, price, shares, timestamp));
        self.events.record(TradeEvent::position_opened(
            step, timestamp, price, side, shares,
        ));
        true
    }

    /// Closes the open position at `price`, realizing its profit or loss.
    ///
    /// Returns `None` when already flat.
    pub fn close(
        &mut self,
        step: usize,
        timestamp: DateTime<Utc>,
        price: Price,
        reason: ExitReason,
    ) -> Option<ClosedTrade> {
        let position = self.position.take()?;
        let pnl = position.pnl_at(price);

        self.balance += pnl;
        self.total_profit += pnl;
        self.trade_count += 1;

        let trade = ClosedTrade {
            side: position.side,
            entry_price: position.entry_price,
            exit_price: price,
            shares: position.shares,
            pnl,
            reason,
        };
        if trade.is_winner() {
            self.winning_trade_count += 1;
        }

        trace!(step, %reason, %pnl, balance = %self.balance, "closing position");
        self.events.record(TradeEvent::position_closed(
            step,
            timestamp,
            price,
            position.side,
            position.entry_price,
            position.shares,
            pnl,
            reason,
        ));
        Some(trade)
    }

    /// Consumes the tracker, returning its event log.
    #[must_use]
    pub fn into_events(self) -> Vec<TradeEvent> {
        self.events.into_events()
    }
}
