use arena_client::engine::LocalEngine;
use arena_client::input::{InputEvent, Key};
use arena_client::mirror::Mirror;
use arena_client::motion;
use arena_shared::config::ArenaConfig;
use arena_shared::participant::{Facing, Intent, ParticipantId, ParticipantState, Position};
use arena_shared::protocol::{JoinedMsg, ServerMsg, DEFAULT_ROOM, PROTOCOL_VERSION};
use proptest::prelude::*;

fn joined_engine() -> LocalEngine {
    let mut engine = LocalEngine::new(ArenaConfig::default());
    engine
        .handle_server_msg(ServerMsg::Joined(JoinedMsg {
            protocol_version: PROTOCOL_VERSION,
            room: DEFAULT_ROOM.to_string(),
            participant: ParticipantState::new(ParticipantId::new("me"), 1),
        }))
        .unwrap();
    engine
}

fn facing_strategy() -> impl Strategy<Value = Facing> {
    prop_oneof![
        Just(Facing::DownLeft),
        Just(Facing::Down),
        Just(Facing::DownRight),
        Just(Facing::Left),
        Just(Facing::UpLeft),
        Just(Facing::Right),
        Just(Facing::UpRight),
        Just(Facing::Up),
    ]
}

fn update_strategy() -> impl Strategy<Value = (f64, f64, [bool; 4], Facing)> {
    (
        0.0f64..=439.0,
        0.0f64..=379.0,
        any::<[bool; 4]>(),
        facing_strategy(),
    )
}

fn update(version: u64, (x, y, flags, facing): (f64, f64, [bool; 4], Facing)) -> ParticipantState {
    let mut s = ParticipantState::new(ParticipantId::new("a"), version);
    s.position = Position::new(x, y);
    s.previous_position = s.position;
    s.target_position = s.position;
    s.interpolation_progress = 1.0;
    s.intent = Intent {
        moving_left: flags[0],
        moving_right: flags[1],
        moving_up: flags[2],
        moving_down: flags[3],
    };
    s.facing = facing;
    s
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Tick,
    Jump,
    Frame,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Tick), Just(Op::Jump), Just(Op::Frame)]
}

fn settle(mirror: &mut Mirror) {
    for _ in 0..25 {
        for state in mirror.iter_mut() {
            motion::interpolate(state, 0.05);
        }
    }
}

proptest! {
    #[test]
    fn merge_order_does_not_matter(
        v1 in 1u64..1_000_000,
        gap in 1u64..1_000,
        first in update_strategy(),
        second in update_strategy(),
    ) {
        let older = update(v1, first);
        let newer = update(v1 + gap, second);

        let mut in_order = Mirror::new();
        in_order.merge(older.clone());
        in_order.merge(newer.clone());

        let mut reversed = Mirror::new();
        reversed.merge(newer.clone());
        reversed.merge(older);

        settle(&mut in_order);
        settle(&mut reversed);

        let id = ParticipantId::new("a");
        let a = in_order.get(&id).unwrap();
        let b = reversed.get(&id).unwrap();
        prop_assert_eq!(a.version, newer.version);
        prop_assert_eq!(b.version, newer.version);
        prop_assert_eq!(a.intent, b.intent);
        prop_assert_eq!(a.facing, b.facing);
        prop_assert!((a.position.x - b.position.x).abs() < 1e-9);
        prop_assert!((a.position.y - b.position.y).abs() < 1e-9);
        prop_assert!((a.position.x - newer.position.x).abs() < 1e-9);
    }

    #[test]
    fn horizontal_target_stays_in_play_area(
        holds in proptest::collection::vec((any::<bool>(), any::<bool>(), 1usize..200), 1..12)
    ) {
        let mut engine = joined_engine();
        for (left, right, frames) in holds {
            let key_event = |key: Key, held: bool| if held { InputEvent::Pressed(key) } else { InputEvent::Released(key) };
            engine.handle_input(key_event(Key::Left, left)).unwrap();
            engine.handle_input(key_event(Key::Right, right)).unwrap();
            for _ in 0..frames {
                engine.frame().unwrap();
                let x = engine.local().unwrap().target_position.x;
                prop_assert!((0.0..=439.0).contains(&x), "target x {} out of range", x);
            }
        }
    }

    #[test]
    fn vertical_target_never_passes_floor(
        ops in proptest::collection::vec(op_strategy(), 1..400)
    ) {
        let mut engine = joined_engine();
        for op in ops {
            match op {
                Op::Tick => engine.apply_gravity_tick().unwrap(),
                Op::Jump => { engine.jump().unwrap(); }
                Op::Frame => { engine.frame().unwrap(); }
            }
            let y = engine.local().unwrap().target_position.y;
            prop_assert!(y <= 379.0, "target y {} below floor", y);
            prop_assert_eq!(engine.physics().is_airborne(), y != 379.0);
        }
    }

    #[test]
    fn jump_while_airborne_is_a_no_op(
        ops in proptest::collection::vec(op_strategy(), 0..200)
    ) {
        let mut engine = joined_engine();
        for op in ops {
            match op {
                Op::Tick => engine.apply_gravity_tick().unwrap(),
                Op::Jump => { engine.jump().unwrap(); }
                Op::Frame => { engine.frame().unwrap(); }
            }
        }
        if engine.physics().is_airborne() {
            let before = engine.local().unwrap().clone();
            let physics = *engine.physics();
            prop_assert_eq!(engine.jump(), Ok(false));
            prop_assert_eq!(engine.local().unwrap(), &before);
            prop_assert_eq!(engine.physics(), &physics);
        }
    }

    #[test]
    fn interpolation_is_idempotent_once_complete(
        from in (0.0f64..=439.0, 0.0f64..=379.0),
        to in (0.0f64..=439.0, 0.0f64..=379.0),
        extra in 1usize..50,
    ) {
        let mut s = ParticipantState::new(ParticipantId::new("p"), 1);
        s.previous_position = Position::new(from.0, from.1);
        s.target_position = Position::new(to.0, to.1);
        for _ in 0..25 {
            motion::interpolate(&mut s, 0.05);
        }
        let settled = s.clone();
        for _ in 0..extra {
            motion::interpolate(&mut s, 0.05);
        }
        prop_assert_eq!(s, settled);
    }
}
