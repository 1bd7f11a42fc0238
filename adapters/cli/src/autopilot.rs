//! Scripted player that steers through the maze with synthetic input.

use std::collections::VecDeque;

use glam::Vec2;
use maze_sprint_core::{CellCoord, Direction};
use maze_sprint_session::{query, shortest_path, GameSession};
use maze_sprint_system_input::{DeviceClass, LogicalKey, RawInput};
use tracing::debug;

/// Length of the synthetic drag gesture, comfortably past the drag threshold.
const GESTURE_LENGTH: f32 = 48.0;

/// Plans routes with breadth-first search and emits the raw input a player
/// on `device` would produce to follow them.
#[derive(Debug)]
pub(crate) struct Autopilot {
    device: DeviceClass,
    collect: bool,
    route: VecDeque<CellCoord>,
    held: Option<Direction>,
}

impl Autopilot {
    pub(crate) fn new(device: DeviceClass, collect: bool) -> Self {
        Self {
            device,
            collect,
            route: VecDeque::new(),
            held: None,
        }
    }

    /// Raw input to feed the mapper before the next tick.
    pub(crate) fn drive(&mut self, session: &GameSession) -> Vec<RawInput> {
        let wanted = self.next_direction(session);
        if wanted == self.held {
            return Vec::new();
        }

        let mut inputs = Vec::new();
        match self.device {
            DeviceClass::Keyboard => {
                if let Some(direction) = self.held {
                    inputs.push(RawInput::KeyUp(LogicalKey::for_direction(direction)));
                }
                if let Some(direction) = wanted {
                    inputs.push(RawInput::KeyDown(LogicalKey::for_direction(direction)));
                }
            }
            DeviceClass::Touch => {
                if self.held.is_some() {
                    inputs.push(RawInput::DragEnd);
                }
                if let Some(direction) = wanted {
                    let (dx, dy) = direction.offset();
                    inputs.push(RawInput::DragStart(Vec2::ZERO));
                    inputs.push(RawInput::DragMove(
                        Vec2::new(dx as f32, dy as f32) * GESTURE_LENGTH,
                    ));
                }
            }
        }
        self.held = wanted;
        inputs
    }

    fn next_direction(&mut self, session: &GameSession) -> Option<Direction> {
        let player = query::player_cell(session);
        while self.route.front() == Some(&player) {
            let _ = self.route.pop_front();
        }

        let adjacent = self
            .route
            .front()
            .and_then(|next| player.direction_to(*next));
        if adjacent.is_some() {
            return adjacent;
        }

        self.route = self.plan(session, player).into();
        self.route
            .front()
            .and_then(|next| player.direction_to(*next))
    }

    fn plan(&self, session: &GameSession, player: CellCoord) -> Vec<CellCoord> {
        let maze = query::maze(session);
        if self.collect {
            let nearest = query::collectibles(session)
                .iter()
                .filter(|item| !item.collected())
                .filter_map(|item| shortest_path(maze, player, item.cell()))
                .min_by_key(Vec::len);
            if let Some(route) = nearest {
                debug!(steps = route.len(), "routing to pickup");
                return route;
            }
        }

        let route = shortest_path(maze, player, maze.end()).unwrap_or_default();
        debug!(steps = route.len(), "routing to core");
        route
    }
}
