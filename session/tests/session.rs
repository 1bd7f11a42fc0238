use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use maze_sprint_core::{
    CellCoord, Character, Command, Direction, Event, EventObserver, Maze, MovementEvent,
    SessionState, PICKUP_AWARD,
};
use maze_sprint_session::{apply, query, GameSession, Observers, SessionConfig};

const FRAME: Duration = Duration::from_millis(16);

fn corridor_session() -> GameSession {
    let maze = Maze::from_ascii(&["#######", "#S...C#", "#######"]).expect("valid layout");
    GameSession::with_layout(SessionConfig::default(), maze, vec![CellCoord::new(3, 1)])
}

fn run(session: &mut GameSession, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(session, command, &mut events);
    events
}

fn enter_playing(session: &mut GameSession, origin: Instant) {
    let _ = run(
        session,
        Command::ReportLoadingProgress {
            percent: 100.0,
            now: origin,
        },
    );
    let _ = run(
        session,
        Command::AdvanceClock {
            now: origin + Duration::from_millis(300),
        },
    );
    let _ = run(
        session,
        Command::SelectCharacter {
            character: Character::Robot,
            now: origin + Duration::from_millis(300),
        },
    );
    assert_eq!(query::state(session), SessionState::Playing);
}

fn step(session: &mut GameSession, direction: Direction) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..20 {
        apply(
            session,
            Command::Tick {
                dt: FRAME,
                intent: Some(direction),
            },
            &mut events,
        );
        if events
            .iter()
            .any(|event| matches!(event, Event::Movement(MovementEvent::Moved { .. })))
        {
            break;
        }
    }
    events
}

#[test]
fn new_session_starts_loading_with_placed_collectibles() {
    let session = GameSession::new(SessionConfig::default());

    assert_eq!(query::state(&session), SessionState::Loading);
    assert_eq!(query::player_cell(&session), CellCoord::new(1, 1));
    assert_eq!(query::maze(&session).width(), 11);

    let collectibles = query::collectibles(&session);
    assert!((5..=8).contains(&collectibles.len()));
    let maze = query::maze(&session);
    for item in collectibles.iter() {
        assert_ne!(item.cell(), maze.start());
        assert_ne!(item.cell(), maze.end());
        assert!(maze.is_traversable(item.cell()));
    }
    assert_eq!(
        query::stats(&session).total_collectibles as usize,
        collectibles.len()
    );
}

#[test]
fn loading_waits_for_settle_delay() {
    let mut session = corridor_session();
    let origin = Instant::now();

    let events = run(
        &mut session,
        Command::ReportLoadingProgress {
            percent: 100.0,
            now: origin,
        },
    );
    assert_eq!(events, vec![Event::LoadingProgressed { percent: 100.0 }]);
    assert!(query::active_timers(&session).loading_settle);

    let early = run(
        &mut session,
        Command::AdvanceClock {
            now: origin + Duration::from_millis(299),
        },
    );
    assert!(early.is_empty());
    assert_eq!(query::state(&session), SessionState::Loading);

    let settled = run(
        &mut session,
        Command::AdvanceClock {
            now: origin + Duration::from_millis(300),
        },
    );
    assert_eq!(
        settled,
        vec![Event::SessionStateChanged {
            from: SessionState::Loading,
            to: SessionState::Selecting,
        }]
    );
    assert!(!query::active_timers(&session).loading_settle);
}

#[test]
fn loading_progress_is_clamped_and_monotonic() {
    let mut session = corridor_session();
    let now = Instant::now();

    let _ = run(
        &mut session,
        Command::ReportLoadingProgress { percent: 40.0, now },
    );
    let regress = run(
        &mut session,
        Command::ReportLoadingProgress { percent: 10.0, now },
    );
    assert!(regress.is_empty());
    assert_eq!(query::loading_progress(&session), 40.0);

    let nan = run(
        &mut session,
        Command::ReportLoadingProgress {
            percent: f32::NAN,
            now,
        },
    );
    assert!(nan.is_empty());

    let overshoot = run(
        &mut session,
        Command::ReportLoadingProgress {
            percent: 250.0,
            now,
        },
    );
    assert_eq!(overshoot, vec![Event::LoadingProgressed { percent: 100.0 }]);
}

#[test]
fn commands_outside_their_state_are_absorbed() {
    let mut session = corridor_session();
    let now = Instant::now();

    let selection = run(
        &mut session,
        Command::SelectCharacter {
            character: Character::Car,
            now,
        },
    );
    assert!(selection.is_empty());
    assert_eq!(query::character(&session), None);

    let tick = run(
        &mut session,
        Command::Tick {
            dt: FRAME,
            intent: Some(Direction::Right),
        },
    );
    assert!(tick.is_empty());
    assert_eq!(query::player_cell(&session), CellCoord::new(1, 1));

    enter_playing(&mut session, now);
    let late_progress = run(
        &mut session,
        Command::ReportLoadingProgress { percent: 50.0, now },
    );
    assert!(late_progress.is_empty());
    let second_selection = run(
        &mut session,
        Command::SelectCharacter {
            character: Character::Car,
            now,
        },
    );
    assert!(second_selection.is_empty());
    assert_eq!(query::character(&session), Some(Character::Robot));
}

#[test]
fn selection_starts_play_and_sampler() {
    let mut session = corridor_session();
    let origin = Instant::now();
    let _ = run(
        &mut session,
        Command::ReportLoadingProgress {
            percent: 100.0,
            now: origin,
        },
    );
    let _ = run(
        &mut session,
        Command::AdvanceClock {
            now: origin + Duration::from_millis(300),
        },
    );

    let events = run(
        &mut session,
        Command::SelectCharacter {
            character: Character::Car,
            now: origin + Duration::from_millis(300),
        },
    );
    assert_eq!(
        events,
        vec![
            Event::CharacterSelected {
                character: Character::Car
            },
            Event::SessionStateChanged {
                from: SessionState::Selecting,
                to: SessionState::Playing,
            },
        ]
    );
    assert!(query::active_timers(&session).elapsed_sampler);
}

#[test]
fn elapsed_sampler_ticks_on_wall_clock() {
    let mut session = corridor_session();
    let origin = Instant::now();
    enter_playing(&mut session, origin);
    let started = origin + Duration::from_millis(300);

    let mut samples = Vec::new();
    for pulse in 1..=10 {
        let events = run(
            &mut session,
            Command::AdvanceClock {
                now: started + Duration::from_millis(pulse * 25),
            },
        );
        samples.extend(events);
    }

    assert_eq!(
        samples,
        vec![
            Event::ElapsedSampled {
                elapsed: Duration::from_millis(100)
            },
            Event::ElapsedSampled {
                elapsed: Duration::from_millis(200)
            },
        ]
    );
    assert_eq!(query::stats(&session).elapsed, Duration::from_millis(200));

    // Frame ticks never move the sampled clock.
    let _ = run(
        &mut session,
        Command::Tick {
            dt: Duration::from_secs(5),
            intent: None,
        },
    );
    assert_eq!(query::stats(&session).elapsed, Duration::from_millis(200));
}

#[test]
fn walking_to_core_awards_pickups_and_bonus() {
    let mut session = corridor_session();
    let origin = Instant::now();
    enter_playing(&mut session, origin);
    let _ = run(
        &mut session,
        Command::AdvanceClock {
            now: origin + Duration::from_millis(1_300),
        },
    );

    let first = step(&mut session, Direction::Right);
    assert_eq!(query::player_cell(&session), CellCoord::new(2, 1));
    assert!(first.contains(&Event::Movement(MovementEvent::Moved {
        from: CellCoord::new(1, 1),
        to: CellCoord::new(2, 1),
    })));

    let pickup = step(&mut session, Direction::Right);
    assert!(pickup.contains(&Event::Movement(MovementEvent::CollectiblePicked {
        cell: CellCoord::new(3, 1)
    })));
    assert!(pickup.contains(&Event::ScoreChanged {
        score: PICKUP_AWARD
    }));

    let _ = step(&mut session, Direction::Right);
    let finish = step(&mut session, Direction::Right);

    assert_eq!(query::state(&session), SessionState::Victory);
    let stats = query::stats(&session);
    assert_eq!(stats.moves, 4);
    assert_eq!(stats.collectibles_collected, 1);
    assert_eq!(stats.elapsed, Duration::from_secs(1));
    // 500 pickup + (10000 - 10) + 1000 + (5000 - 40)
    assert_eq!(stats.score, 16_450);

    let completed = finish
        .iter()
        .find_map(|event| match event {
            Event::SessionCompleted { breakdown, stats } => Some((*breakdown, *stats)),
            _ => None,
        })
        .expect("completion event");
    assert_eq!(completed.0.total(), 15_950);
    assert_eq!(completed.1, stats);
    assert!(finish.contains(&Event::SessionStateChanged {
        from: SessionState::Playing,
        to: SessionState::Victory,
    }));
}

#[test]
fn victory_releases_timers_and_freezes_play() {
    let mut session = corridor_session();
    let origin = Instant::now();
    enter_playing(&mut session, origin);
    for _ in 0..4 {
        let _ = step(&mut session, Direction::Right);
    }
    assert_eq!(query::state(&session), SessionState::Victory);
    assert_eq!(query::active_timers(&session), query::ActiveTimers::default());

    let score = query::stats(&session).score;
    let after = run(
        &mut session,
        Command::AdvanceClock {
            now: origin + Duration::from_secs(60),
        },
    );
    assert!(after.is_empty());
    let frozen = step(&mut session, Direction::Left);
    assert!(frozen.is_empty());
    assert_eq!(query::stats(&session).score, score);
    assert_eq!(query::player_cell(&session), CellCoord::new(5, 1));
}

#[test]
fn revisiting_collected_cell_changes_nothing() {
    let mut session = corridor_session();
    enter_playing(&mut session, Instant::now());
    let _ = step(&mut session, Direction::Right);
    let _ = step(&mut session, Direction::Right);
    let _ = step(&mut session, Direction::Left);
    let stats_before = query::stats(&session);

    let revisit = step(&mut session, Direction::Right);

    assert!(!revisit
        .iter()
        .any(|event| matches!(event, Event::ScoreChanged { .. })));
    let stats_after = query::stats(&session);
    assert_eq!(stats_after.score, stats_before.score);
    assert_eq!(
        stats_after.collectibles_collected,
        stats_before.collectibles_collected
    );
    assert_eq!(stats_after.moves, stats_before.moves + 1);
}

#[test]
fn repeated_pickup_cells_award_once() {
    let maze = Maze::from_ascii(&["#######", "#S...C#", "#######"]).expect("valid layout");
    let cell = CellCoord::new(2, 1);
    let mut session = GameSession::with_layout(SessionConfig::default(), maze, vec![cell, cell]);
    assert_eq!(query::stats(&session).total_collectibles, 1);
    assert_eq!(query::collectibles(&session).len(), 1);

    enter_playing(&mut session, Instant::now());
    let _ = step(&mut session, Direction::Right);
    let _ = step(&mut session, Direction::Left);
    let revisit = step(&mut session, Direction::Right);

    assert!(!revisit
        .iter()
        .any(|event| matches!(event, Event::Movement(MovementEvent::CollectiblePicked { .. }))));
    let stats = query::stats(&session);
    assert_eq!(stats.collectibles_collected, 1);
    assert_eq!(stats.score, PICKUP_AWARD);
    assert_eq!(stats.total_collectibles, 1);
}

#[test]
fn wall_bumps_do_not_count_as_moves() {
    let mut session = corridor_session();
    enter_playing(&mut session, Instant::now());

    let events = step(&mut session, Direction::Up);

    assert!(events.is_empty());
    assert_eq!(query::stats(&session).moves, 0);
    assert_eq!(query::player_cell(&session), CellCoord::new(1, 1));
    assert_eq!(query::move_cooldown_remaining(&session), Duration::ZERO);
}

#[test]
fn reset_discards_session_and_returns_to_loading() {
    let config = SessionConfig {
        maze_width: 15,
        maze_height: 13,
        seed: 21,
        ..SessionConfig::default()
    };
    let maze = Maze::from_ascii(&["#######", "#S...C#", "#######"]).expect("valid layout");
    let mut session = GameSession::with_layout(config, maze, vec![CellCoord::new(2, 1)]);
    let origin = Instant::now();
    enter_playing(&mut session, origin);
    let _ = step(&mut session, Direction::Right);

    let events = run(&mut session, Command::ResetSession);

    assert_eq!(
        events,
        vec![
            Event::SessionReset,
            Event::SessionStateChanged {
                from: SessionState::Playing,
                to: SessionState::Loading,
            },
        ]
    );
    assert_eq!(query::state(&session), SessionState::Loading);
    assert_eq!(query::active_timers(&session), query::ActiveTimers::default());
    assert_eq!(query::character(&session), None);
    assert_eq!(query::loading_progress(&session), 0.0);
    assert_eq!(query::player_cell(&session), CellCoord::new(1, 1));

    let maze = query::maze(&session);
    assert_eq!((maze.width(), maze.height()), (15, 13));
    let stats = query::stats(&session);
    assert_eq!(stats.moves, 0);
    assert_eq!(stats.score, 0);
    assert_eq!(
        stats.total_collectibles as usize,
        query::collectibles(&session).len()
    );
    assert_eq!(query::collectibles(&session).collected_count(), 0);
}

#[test]
fn reset_during_loading_releases_settle_timer() {
    let mut session = corridor_session();
    let _ = run(
        &mut session,
        Command::ReportLoadingProgress {
            percent: 100.0,
            now: Instant::now(),
        },
    );
    assert!(query::active_timers(&session).loading_settle);

    let events = run(&mut session, Command::ResetSession);

    assert_eq!(events, vec![Event::SessionReset]);
    assert!(!query::active_timers(&session).loading_settle);
}

#[test]
fn generated_core_is_reachable_by_shortest_path() {
    let session = GameSession::new(SessionConfig {
        maze_width: 21,
        maze_height: 21,
        seed: 5,
        ..SessionConfig::default()
    });
    let maze = query::maze(&session);
    let route = maze_sprint_session::shortest_path(maze, maze.start(), maze.end())
        .expect("core reachable");
    assert_eq!(route.last().copied(), Some(maze.end()));
    assert!(route
        .windows(2)
        .all(|pair| pair[0].manhattan_distance(pair[1]) == 1));
}

#[derive(Clone, Default)]
struct Recorder {
    batches: Rc<RefCell<Vec<Vec<Event>>>>,
}

impl EventObserver for Recorder {
    fn observe(&mut self, events: &[Event]) {
        self.batches.borrow_mut().push(events.to_vec());
    }
}

#[test]
fn observers_receive_each_batch_once() {
    let first = Recorder::default();
    let second = Recorder::default();
    let mut observers = Observers::new();
    observers.register(Box::new(first.clone()));
    observers.register(Box::new(second.clone()));
    assert_eq!(observers.len(), 2);

    let mut session = corridor_session();
    let mut events = Vec::new();
    apply(
        &mut session,
        Command::ReportLoadingProgress {
            percent: 30.0,
            now: Instant::now(),
        },
        &mut events,
    );
    observers.publish(&events);
    observers.publish(&[]);

    for recorder in [first, second] {
        let batches = recorder.batches.borrow();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec![Event::LoadingProgressed { percent: 30.0 }]);
    }
}

#[test]
fn config_loads_from_toml() {
    let config: SessionConfig = toml::from_str(
        r#"
            maze_width = 25
            maze_height = 17
            seed = 99
            min_collectibles = 2
            max_collectibles = 3
            move_cooldown_ms = 120
        "#,
    )
    .expect("valid config");

    assert_eq!(config.move_cooldown(), Duration::from_millis(120));
    let session = GameSession::new(config);
    assert_eq!(query::maze(&session).width(), 25);
    assert_eq!(query::maze(&session).height(), 17);
    assert!((2..=3).contains(&query::collectibles(&session).len()));
}
