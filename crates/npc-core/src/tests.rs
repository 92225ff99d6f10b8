//! Unit tests for npc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EntityRef, NodeId, SolidId};

    #[test]
    fn typed_index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
        assert!(!NodeId::INVALID.is_valid());
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn agent_handles_order_by_slot() {
        assert!(AgentId::new(0, 9) < AgentId::new(1, 0));
        assert_ne!(AgentId::new(3, 0), AgentId::new(3, 1));
        assert_eq!(AgentId::new(7, 2).to_string(), "Agent(7v2)");
    }

    #[test]
    fn entity_ref_agent_projection() {
        let a = AgentId::new(1, 0);
        assert_eq!(EntityRef::Agent(a).agent(), Some(a));
        assert_eq!(EntityRef::Solid(SolidId(3)).agent(), None);
        assert_eq!(EntityRef::World.agent(), None);
    }
}

#[cfg(test)]
mod geo {
    use crate::geo::{angle_mod, yaw_delta};
    use crate::{Plane, Vec3};

    #[test]
    fn yaw_of_axes() {
        assert!((Vec3::new(1.0, 0.0, 0.0).to_yaw() - 0.0).abs() < 1e-4);
        assert!((Vec3::new(0.0, 1.0, 0.0).to_yaw() - 90.0).abs() < 1e-4);
        assert!((Vec3::new(0.0, -1.0, 0.0).to_yaw() - 270.0).abs() < 1e-4);
    }

    #[test]
    fn right_axis_is_clockwise() {
        let r = Vec3::right_of_yaw(0.0);
        assert!(r.x.abs() < 1e-5 && (r.y + 1.0).abs() < 1e-5, "got {r}");
    }

    #[test]
    fn yaw_delta_takes_short_way() {
        assert!((yaw_delta(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((yaw_delta(10.0, 350.0) + 20.0).abs() < 1e-4);
        assert!((angle_mod(-30.0) - 330.0).abs() < 1e-4);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let n = Vec3::new(3.0, 4.0, 0.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn plane_front_side() {
        let p = Plane::through(Vec3::new(1.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0));
        assert!(p.point_in_front(Vec3::new(6.0, 3.0, 0.0)));
        assert!(p.point_in_front(Vec3::new(5.0, 0.0, 0.0)));
        assert!(!p.point_in_front(Vec3::new(4.0, 0.0, 0.0)));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn clock_seconds() {
        let mut clock = SimClock::new(0.1);
        for _ in 0..25 {
            clock.advance();
        }
        assert_eq!(clock.current_tick, Tick(25));
        assert!((clock.now_secs() - 2.5).abs() < 1e-4);
        assert_eq!(clock.ticks_for_secs(0.25), 3);
        assert_eq!(clock.ticks_for_secs(0.0), 1);
    }
}

#[cfg(test)]
mod flags {
    use crate::{Conditions, Memory, SoundTypes};

    #[test]
    fn composite_condition_sets() {
        assert!(Conditions::CAN_ATTACK.contains(Conditions::CAN_MELEE_ATTACK2));
        assert!(Conditions::ALL_SEE.contains(Conditions::SEE_ENEMY));
        assert!(!Conditions::ALL_SEE.contains(Conditions::HEAR_SOUND));
    }

    #[test]
    fn sound_classes() {
        assert!(SoundTypes::COMBAT.is_sound());
        assert!(!SoundTypes::COMBAT.is_scent());
        assert!(SoundTypes::MEAT.is_scent());
        assert!(SoundTypes::FOOD.contains(SoundTypes::CARCASS));
    }

    #[test]
    fn memory_bit_index() {
        assert_eq!(Memory::from_bit_index(6), Some(Memory::FLINCHED));
        assert_eq!(Memory::from_bit_index(31), Some(Memory::CUSTOM1));
        assert_eq!(Memory::from_bit_index(32), None);
    }
}

#[cfg(test)]
mod relation {
    use crate::{Classification, Relationship};

    #[test]
    fn soldiers_hate_players() {
        assert_eq!(
            Relationship::between(Classification::HumanMilitary, Classification::Player),
            Relationship::Hate
        );
        assert_eq!(
            Relationship::between(Classification::HumanMilitary, Classification::HumanMilitary),
            Relationship::None
        );
    }

    #[test]
    fn ordering_ranks_hostility() {
        assert!(Relationship::Nemesis > Relationship::Hate);
        assert!(Relationship::Hate > Relationship::Dislike);
        assert!(Relationship::Fear < Relationship::None);
        assert!(!Relationship::Fear.is_hostile());
        assert!(Relationship::Dislike.is_hostile());
    }
}

#[cfg(test)]
mod config {
    use crate::EngineConfig;

    #[test]
    fn default_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_too_many_rings() {
        let cfg = EngineConfig { triangulation_rings: 9, ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_oversized_squads() {
        let cfg = EngineConfig { max_squad_size: 6, ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod state {
    use crate::MonsterState;

    #[test]
    fn repr_and_name_agree() {
        for id in 0..8u8 {
            let st = MonsterState::from_repr(id).unwrap();
            assert_eq!(st as u8, id);
            assert_eq!(st.name().parse::<MonsterState>().unwrap(), st);
        }
        assert_eq!(MonsterState::from_repr(8), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("combat".parse::<MonsterState>().unwrap(), MonsterState::Combat);
        assert!("sleeping".parse::<MonsterState>().is_err());
    }
}
