//! The two demonstration species.

use npc_agent::{Agent, AgentBuilder};
use npc_behavior::{AttackKind, Species, ThinkOutput};
use npc_core::{Capabilities, Conditions, SoundTypes};
use npc_schedule::{Activity, ScheduleCatalog, ScheduleRef, ScheduleType};

// ── Grunt ─────────────────────────────────────────────────────────────────────

/// Squad rifleman.  Runs dry now and then and has to reload, and lays down
/// suppressing fire from cover instead of standing off.
pub struct Grunt;

/// Chance that a burst empties the magazine.
const DRY_CHANCE: f64 = 0.2;

impl Species for Grunt {
    fn name(&self) -> &str {
        "grunt"
    }

    fn on_create(&self, builder: AgentBuilder) -> AgentBuilder {
        builder
            .capabilities(
                Capabilities::SQUAD
                    | Capabilities::RANGE_ATTACK1
                    | Capabilities::OPEN_DOORS
                    | Capabilities::HEAR
                    | Capabilities::DUCK,
            )
            .health(60.0)
            .speeds(90.0, 240.0)
    }

    fn handle_anim_event(&self, agent: &mut Agent, activity: Activity, _out: &mut ThinkOutput) {
        if activity == Activity::RangeAttack1 && agent.rng.gen_bool(DRY_CHANCE) {
            agent.set_conditions(Conditions::NO_AMMO_LOADED);
        }
    }

    fn schedule_of_type(&self, agent: &Agent, ty: ScheduleType, catalog: &ScheduleCatalog) -> Option<ScheduleRef> {
        match ty {
            ScheduleType::RangeAttack1 if agent.has_conditions(Conditions::NO_AMMO_LOADED) => {
                catalog.generic(ScheduleType::Reload)
            }
            ScheduleType::Standoff => catalog.by_name("GruntSuppress"),
            _ => None,
        }
    }

    fn check_range_attack1(&self, _agent: &Agent, dot: f32, dist: f32) -> bool {
        dist > 64.0 && dist <= 1024.0 && dot >= 0.6
    }

    fn attack(&self, _agent: &Agent, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Range1 => 6.0,
            _ => 10.0,
        }
    }
}

// ── Slave ─────────────────────────────────────────────────────────────────────

/// Alien with a short-range bolt and claws.  Smells as well as hears.
pub struct Slave;

impl Species for Slave {
    fn name(&self) -> &str {
        "slave"
    }

    fn on_create(&self, builder: AgentBuilder) -> AgentBuilder {
        builder
            .capabilities(
                Capabilities::RANGE_ATTACK2
                    | Capabilities::MELEE_ATTACK1
                    | Capabilities::OPEN_DOORS
                    | Capabilities::HEAR,
            )
            .health(80.0)
            .speeds(70.0, 200.0)
    }

    fn sound_mask(&self, _agent: &Agent) -> SoundTypes {
        SoundTypes::ALL_SOUNDS | SoundTypes::ALL_SCENTS
    }

    fn activity_duration(&self, _agent: &Agent, activity: Activity) -> f32 {
        match activity {
            // Charging the bolt is slow.
            Activity::RangeAttack2 => 1.2,
            Activity::MeleeAttack1 => 0.5,
            Activity::Die => 1.5,
            Activity::SmallFlinch => 0.4,
            Activity::BigFlinch => 0.8,
            Activity::TurnLeft | Activity::TurnRight => 0.5,
            Activity::VictoryDance => 2.0,
            _ => 0.0,
        }
    }
}
