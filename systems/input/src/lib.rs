#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input mapping system that distils raw key and drag input into a single
//! direction intent per tick.

use std::{collections::HashSet, str::FromStr};

use glam::Vec2;
use maze_sprint_core::{Direction, DirectionIntent};
use thiserror::Error;

/// Distance a drag must travel along its dominant axis before it steers.
pub const DRAG_THRESHOLD: f32 = 30.0;

/// Logical keys that steer the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    /// `w`, steering up.
    W,
    /// `a`, steering left.
    A,
    /// `s`, steering down.
    S,
    /// `d`, steering right.
    D,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
}

impl LogicalKey {
    /// Direction the key steers toward.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::W | Self::ArrowUp => Direction::Up,
            Self::S | Self::ArrowDown => Direction::Down,
            Self::A | Self::ArrowLeft => Direction::Left,
            Self::D | Self::ArrowRight => Direction::Right,
        }
    }

    /// Primary key bound to `direction`.
    #[must_use]
    pub const fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::W,
            Direction::Down => Self::S,
            Direction::Left => Self::A,
            Direction::Right => Self::D,
        }
    }
}

/// Raised when a key name does not map to a steering key.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("key `{0}` does not steer the player")]
pub struct UnknownKey(pub String);

impl FromStr for LogicalKey {
    type Err = UnknownKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "w" => Ok(Self::W),
            "a" => Ok(Self::A),
            "s" => Ok(Self::S),
            "d" => Ok(Self::D),
            "arrowup" => Ok(Self::ArrowUp),
            "arrowdown" => Ok(Self::ArrowDown),
            "arrowleft" => Ok(Self::ArrowLeft),
            "arrowright" => Ok(Self::ArrowRight),
            _ => Err(UnknownKey(value.to_owned())),
        }
    }
}

/// Class of device whose channel decides the intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// Held keys decide the intent.
    #[default]
    Keyboard,
    /// Touch drags decide the intent.
    Touch,
}

/// Raw input captured by the host adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawInput {
    /// A steering key went down.
    KeyDown(LogicalKey),
    /// A steering key was released.
    KeyUp(LogicalKey),
    /// A drag started at the given point.
    DragStart(Vec2),
    /// An active drag moved to the given point.
    DragMove(Vec2),
    /// The active drag ended.
    DragEnd,
}

/// Tracks held keys and resolves them by fixed precedence.
#[derive(Clone, Debug, Default)]
pub struct KeyboardChannel {
    held: HashSet<LogicalKey>,
}

impl KeyboardChannel {
    /// Records `key` as held.
    pub fn press(&mut self, key: LogicalKey) {
        let _ = self.held.insert(key);
    }

    /// Records `key` as released.
    pub fn release(&mut self, key: LogicalKey) {
        let _ = self.held.remove(&key);
    }

    /// Releases every held key, e.g. when the host loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Highest-precedence held direction: up, then down, then left, then right.
    #[must_use]
    pub fn intent(&self) -> DirectionIntent {
        Direction::ALL
            .into_iter()
            .find(|direction| self.held.iter().any(|key| key.direction() == *direction))
    }
}

/// Turns a drag gesture into a direction that holds until the drag ends.
#[derive(Clone, Debug)]
pub struct DragChannel {
    threshold: f32,
    origin: Option<Vec2>,
    locked: DirectionIntent,
}

impl Default for DragChannel {
    fn default() -> Self {
        Self::with_threshold(DRAG_THRESHOLD)
    }
}

impl DragChannel {
    /// Creates a channel steering once a drag exceeds `threshold` units.
    #[must_use]
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            origin: None,
            locked: None,
        }
    }

    /// Starts a drag at `origin`, discarding any previous gesture.
    pub fn begin(&mut self, origin: Vec2) {
        self.origin = Some(origin);
        self.locked = None;
    }

    /// Updates the active drag; the first direction past the threshold sticks.
    pub fn update(&mut self, point: Vec2) {
        let Some(origin) = self.origin else {
            return;
        };
        if self.locked.is_some() {
            return;
        }
        self.locked = resolve_drag(point - origin, self.threshold);
    }

    /// Ends the drag and returns the channel to idle.
    pub fn end(&mut self) {
        self.origin = None;
        self.locked = None;
    }

    /// Direction held by the current drag.
    #[must_use]
    pub const fn intent(&self) -> DirectionIntent {
        self.locked
    }
}

fn resolve_drag(delta: Vec2, threshold: f32) -> DirectionIntent {
    if delta.x.abs() > delta.y.abs() {
        if delta.x > threshold {
            Some(Direction::Right)
        } else if delta.x < -threshold {
            Some(Direction::Left)
        } else {
            None
        }
    } else if delta.y > threshold {
        Some(Direction::Down)
    } else if delta.y < -threshold {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Input mapper feeding both channels and reading the authoritative one.
#[derive(Clone, Debug, Default)]
pub struct InputMapper {
    device: DeviceClass,
    keyboard: KeyboardChannel,
    drag: DragChannel,
}

impl InputMapper {
    /// Creates a mapper whose intent follows `device`.
    #[must_use]
    pub fn new(device: DeviceClass) -> Self {
        Self {
            device,
            ..Self::default()
        }
    }

    /// Device class currently deciding the intent.
    #[must_use]
    pub const fn device(&self) -> DeviceClass {
        self.device
    }

    /// Hands authority to another device class.
    pub fn set_device(&mut self, device: DeviceClass) {
        self.device = device;
    }

    /// Routes a raw input to its channel.
    pub fn apply(&mut self, input: RawInput) {
        match input {
            RawInput::KeyDown(key) => self.keyboard.press(key),
            RawInput::KeyUp(key) => self.keyboard.release(key),
            RawInput::DragStart(origin) => self.drag.begin(origin),
            RawInput::DragMove(point) => self.drag.update(point),
            RawInput::DragEnd => self.drag.end(),
        }
    }

    /// Direction intent for the current tick.
    #[must_use]
    pub fn intent(&self) -> DirectionIntent {
        match self.device {
            DeviceClass::Keyboard => self.keyboard.intent(),
            DeviceClass::Touch => self.drag.intent(),
        }
    }
}
