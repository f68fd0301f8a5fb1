//! # Session Events
//!
//! State changes the presentation layer cares about. The session emits them;
//! subscribers drain their receiver whenever they redraw. Events are only
//! emitted on change, never every tick.

use std::sync::mpsc::{channel, Receiver, Sender};

use cgmath::Point3;

use super::{
    player_state::PlayerMode,
    voxels::block::{block_type::BlockId, Coordinate},
    SessionState,
};

/// Something observable changed.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Lifecycle transition.
    StateChanged(SessionState),
    /// Generation finished and the player was placed; carries the block count.
    WorldReady(usize),
    /// The player's feet moved.
    PositionChanged(Point3<f32>),
    /// Walk/Fly toggled.
    ModeChanged(PlayerMode),
    /// Stock of a type changed; carries the new count.
    InventoryChanged(BlockId, u32),
    /// A different block type is selected.
    SelectedBlockChanged(BlockId),
    /// The targeted block or ghost cell changed.
    SelectionChanged {
        /// Block under the crosshair.
        target: Option<Coordinate>,
        /// Cell where the ghost is shown.
        ghost: Option<Coordinate>,
    },
    /// A block was placed by the player.
    BlockPlaced(Coordinate, BlockId),
    /// A block was removed by the player.
    BlockRemoved(Coordinate, BlockId),
}

/// Fan-out of session events to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<SessionEvent>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        receiver
    }

    /// Delivers `event` to every live subscriber.
    pub fn emit(&mut self, event: SessionEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    /// Number of live subscribers as of the last emit.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
