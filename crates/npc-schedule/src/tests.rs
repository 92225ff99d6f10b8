//! Unit tests for npc-schedule.

use std::io::Cursor;
use std::sync::Arc;

use npc_core::{Conditions, Memory, MonsterState, SoundTypes, SpeciesId};

use crate::{
    load_schedules_reader, Activity, ParamMeaning, Schedule, ScheduleCatalog, ScheduleError,
    ScheduleType, Task, TaskKind,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn one_task(name: &str) -> Arc<Schedule> {
    Arc::new(
        Schedule::new(name, vec![Task::wait(1.0)], Conditions::NEW_ENEMY, SoundTypes::empty()).unwrap(),
    )
}

// ── Tasks ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod task {
    use super::*;

    #[test]
    fn param_meanings_are_fixed() {
        assert_eq!(TaskKind::Wait.param_meaning(), ParamMeaning::Seconds);
        assert_eq!(TaskKind::Remember.param_meaning(), ParamMeaning::MemoryBit);
        assert_eq!(TaskKind::SetFailSchedule.param_meaning(), ParamMeaning::ScheduleType);
        assert_eq!(TaskKind::FindCoverFromEnemy.param_meaning(), ParamMeaning::Distance);
        assert_eq!(TaskKind::RunPath.param_meaning(), ParamMeaning::None);
    }

    #[test]
    fn typed_constructors_decode() {
        assert_eq!(Task::remember(Memory::IN_COVER).memory(), Some(Memory::IN_COVER));
        assert_eq!(Task::forget(Memory::CUSTOM1).memory(), Some(Memory::CUSTOM1));
        assert_eq!(
            Task::set_fail_schedule(ScheduleType::ChaseEnemyFailed).schedule_type(),
            Some(ScheduleType::ChaseEnemyFailed)
        );
        assert_eq!(Task::set_activity(Activity::Run).activity(), Some(Activity::Run));
        assert_eq!(Task::suggest_state(MonsterState::Alert).state(), Some(MonsterState::Alert));
    }

    #[test]
    fn display_uses_symbolic_params() {
        assert_eq!(Task::set_activity(Activity::Idle).to_string(), "SetActivity(Idle)");
        assert_eq!(Task::of(TaskKind::RunPath).to_string(), "RunPath");
        assert_eq!(Task::wait(2.0).to_string(), "Wait(2)");
    }
}

// ── Schedules ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule {
    use super::*;

    #[test]
    fn empty_task_list_is_rejected() {
        let err = Schedule::new("Nothing", vec![], Conditions::empty(), SoundTypes::empty()).unwrap_err();
        assert!(matches!(err, ScheduleError::EmptySchedule(name) if name == "Nothing"));
    }

    #[test]
    fn task_lookup_stops_at_end() {
        let s = one_task("Solo");
        assert!(s.task(0).is_some());
        assert!(s.task(1).is_none());
        assert_eq!(s.len(), 1);
        assert!(s.interrupted_by(Conditions::NEW_ENEMY));
        assert!(!s.interrupted_by(Conditions::HEAR_SOUND));
    }

    #[test]
    fn defaults_cover_every_generic_type() {
        let cat = ScheduleCatalog::with_defaults();
        for id in 1..(ScheduleType::Custom1 as u16) {
            let ty = ScheduleType::from_repr(id).unwrap();
            assert!(cat.generic(ty).is_some(), "missing generic {ty}");
        }
        assert!(cat.generic(ScheduleType::Custom1).is_none());
    }

    #[test]
    fn chase_sets_its_own_fail_schedule() {
        let cat = ScheduleCatalog::with_defaults();
        let chase = cat.generic(ScheduleType::ChaseEnemy).unwrap();
        assert_eq!(chase.tasks()[0], Task::set_fail_schedule(ScheduleType::ChaseEnemyFailed));
        assert!(chase.interrupted_by(Conditions::TASK_FAILED));
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod catalog {
    use super::*;

    #[test]
    fn species_entry_wins_over_generic() {
        let mut cat = ScheduleCatalog::with_defaults();
        let grunt = SpeciesId(2);
        cat.insert_species(grunt, ScheduleType::RangeAttack1, one_task("GruntShoot"));
        assert_eq!(cat.resolve(grunt, ScheduleType::RangeAttack1).name(), "GruntShoot");
        assert_eq!(cat.resolve(SpeciesId(9), ScheduleType::RangeAttack1).name(), "RangeAttack1");
    }

    #[test]
    fn missing_type_falls_back_to_idle() {
        let cat = ScheduleCatalog::with_defaults();
        assert_eq!(cat.resolve(SpeciesId(0), ScheduleType::Custom3).name(), "IdleStand");
        let bare = ScheduleCatalog::empty();
        assert_eq!(bare.resolve(SpeciesId(0), ScheduleType::Standoff).name(), "IdleStand");
    }

    #[test]
    fn fail_registry_by_name() {
        let cat = ScheduleCatalog::with_defaults();
        assert_eq!(cat.fail_for("ChaseEnemy"), Some(ScheduleType::ChaseEnemyFailed));
        assert_eq!(cat.fail_for("IdleStand"), None);
    }

    #[test]
    fn unnamed_lookup_is_not_found() {
        let cat = ScheduleCatalog::with_defaults();
        assert!(cat.by_name("").is_none());
        assert!(cat.by_name("Standoff").is_some());
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    const CSV: &str = "\
schedule,type,species,fail,task,param,interrupts,sounds
GruntCover,TakeCoverFromEnemy,3,CombatFace,StopMoving,,NEW_ENEMY | HEAR_SOUND,DANGER
GruntCover,,,,FindCoverFromEnemy,512,,
GruntCover,,,,RunPath,,,
GruntCover,,,,WaitForMovement,,,
GruntCover,,,,Remember,IN_COVER,,
Sweep,,,,SetActivity,Walk,,
Sweep,,,,Wait,3,,
Sweep,,,,SuggestState,Alert,,
";

    #[test]
    fn groups_consecutive_rows() {
        let loaded = load_schedules_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(loaded.len(), 2);

        let cover = &loaded[0];
        assert_eq!(cover.schedule.name(), "GruntCover");
        assert_eq!(cover.ty, Some(ScheduleType::TakeCoverFromEnemy));
        assert_eq!(cover.species, Some(SpeciesId(3)));
        assert_eq!(cover.fail, Some(ScheduleType::CombatFace));
        assert_eq!(cover.schedule.interrupts(), Conditions::NEW_ENEMY | Conditions::HEAR_SOUND);
        assert_eq!(cover.schedule.sounds(), SoundTypes::DANGER);
        assert_eq!(cover.schedule.len(), 5);
        assert_eq!(cover.schedule.tasks()[1], Task::new(TaskKind::FindCoverFromEnemy, 512.0));
        assert_eq!(cover.schedule.tasks()[4], Task::remember(Memory::IN_COVER));

        let sweep = &loaded[1];
        assert_eq!(sweep.ty, None);
        assert_eq!(sweep.schedule.tasks()[0], Task::set_activity(Activity::Walk));
        assert_eq!(sweep.schedule.tasks()[2], Task::suggest_state(MonsterState::Alert));
    }

    #[test]
    fn catalog_extension_registers_everything() {
        let mut cat = ScheduleCatalog::with_defaults();
        let added = cat.extend_from_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(added, 2);
        assert_eq!(cat.resolve(SpeciesId(3), ScheduleType::TakeCoverFromEnemy).name(), "GruntCover");
        assert_eq!(cat.fail_for("GruntCover"), Some(ScheduleType::CombatFace));
        assert!(cat.by_name("Sweep").is_some());
    }

    #[test]
    fn unknown_task_is_an_error() {
        let csv = "schedule,type,species,fail,task,param,interrupts,sounds\nX,,,,Teleport,,,\n";
        let err = load_schedules_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownTask(t) if t == "Teleport"));
    }

    #[test]
    fn symbolic_param_must_match_meaning() {
        let csv = "schedule,type,species,fail,task,param,interrupts,sounds\nX,,,,Wait,Idle,,\n";
        let err = load_schedules_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ScheduleError::BadParam { .. }));
    }

    #[test]
    fn bad_flag_name_is_a_parse_error() {
        let csv = "schedule,type,species,fail,task,param,interrupts,sounds\nX,,,,Wait,1,SEE_GHOSTS,\n";
        let err = load_schedules_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(_)));
    }
}
