//! The generic schedule set every species falls back on.

use npc_core::{Conditions as C, Memory, MonsterState, SoundTypes as S};

use crate::schedule::{Schedule, ScheduleRef, ScheduleType};
use crate::task::{voice, Activity, Task, TaskKind as K};

const DAMAGE: C = C::ANY_DAMAGE;

/// Interrupts shared by every attack schedule.
const ATTACK_BREAK: C = C::NEW_ENEMY
    .union(C::ENEMY_DEAD)
    .union(DAMAGE)
    .union(C::ENEMY_OCCLUDED);

const ALL_STIMULI: S = S::ALL_SOUNDS.union(S::ALL_SCENTS);

/// Schedule names that have a dedicated fail schedule.
pub const DEFAULT_FAIL_SCHEDULES: &[(&str, ScheduleType)] = &[
    ("ChaseEnemy", ScheduleType::ChaseEnemyFailed),
    ("Patrol", ScheduleType::IdleStand),
    ("InvestigateSound", ScheduleType::AlertStand),
];

fn cover(name: &str, find: K, then_face: Task) -> ScheduleRef {
    Schedule::fixed(
        name,
        &[
            Task::of(K::StopMoving),
            Task::wait(0.2),
            Task::of(find),
            Task::of(K::RunPath),
            Task::of(K::WaitForMovement),
            Task::remember(Memory::IN_COVER),
            then_face,
            Task::wait(1.0),
        ],
        C::NEW_ENEMY,
        S::empty(),
    )
}

fn attack(name: &str, kind: K, extra: C, sounds: S) -> ScheduleRef {
    Schedule::fixed(
        name,
        &[Task::of(K::StopMoving), Task::of(K::FaceEnemy), Task::of(kind)],
        ATTACK_BREAK | extra,
        sounds,
    )
}

/// One schedule per generic [`ScheduleType`] (the `Custom*` slots excluded).
pub fn default_schedules() -> Vec<(ScheduleType, ScheduleRef)> {
    use ScheduleType as T;

    vec![
        (
            T::IdleStand,
            Schedule::fixed(
                "IdleStand",
                &[Task::of(K::StopMoving), Task::set_activity(Activity::Idle), Task::wait(5.0)],
                C::NEW_ENEMY | C::SEE_FEAR | DAMAGE | C::HEAR_SOUND | C::SMELL_FOOD | C::SMELL | C::PROVOKED,
                ALL_STIMULI,
            ),
        ),
        (
            T::Patrol,
            Schedule::fixed(
                "Patrol",
                &[
                    Task::of(K::GetPathToPatrol),
                    Task::of(K::WalkPath),
                    Task::of(K::WaitForMovement),
                    Task::set_activity(Activity::Idle),
                    Task::wait(1.0),
                ],
                C::NEW_ENEMY | C::SEE_FEAR | DAMAGE | C::HEAR_SOUND | C::SMELL | C::PROVOKED,
                S::ALL_SOUNDS,
            ),
        ),
        (
            T::Wake,
            Schedule::fixed(
                "Wake",
                &[Task::of(K::StopMoving), Task::set_activity(Activity::Idle), Task::of(K::FaceIdeal)],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::WakeAngry,
            Schedule::fixed(
                "WakeAngry",
                &[
                    Task::of(K::StopMoving),
                    Task::set_activity(Activity::Idle),
                    Task::new(K::Vocalize, voice::WAKE),
                    Task::of(K::FaceIdeal),
                ],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::AlertFace,
            Schedule::fixed(
                "AlertFace",
                &[Task::of(K::StopMoving), Task::set_activity(Activity::Idle), Task::of(K::FaceIdeal)],
                C::NEW_ENEMY | C::SEE_FEAR | DAMAGE | C::PROVOKED,
                S::empty(),
            ),
        ),
        (
            T::AlertSmallFlinch,
            Schedule::fixed(
                "AlertSmallFlinch",
                &[
                    Task::of(K::StopMoving),
                    Task::remember(Memory::FLINCHED),
                    Task::of(K::SmallFlinch),
                    Task::set_schedule(T::AlertFace),
                ],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::AlertBigFlinch,
            Schedule::fixed(
                "AlertBigFlinch",
                &[
                    Task::of(K::StopMoving),
                    Task::remember(Memory::FLINCHED),
                    Task::of(K::BigFlinch),
                    Task::set_schedule(T::AlertFace),
                ],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::AlertStand,
            Schedule::fixed(
                "AlertStand",
                &[
                    Task::of(K::StopMoving),
                    Task::set_activity(Activity::Idle),
                    Task::wait(20.0),
                    Task::suggest_state(MonsterState::Idle),
                ],
                C::NEW_ENEMY | C::SEE_ENEMY | C::SEE_FEAR | DAMAGE | C::PROVOKED | C::SMELL | C::SMELL_FOOD
                    | C::HEAR_SOUND,
                ALL_STIMULI,
            ),
        ),
        (
            T::InvestigateSound,
            Schedule::fixed(
                "InvestigateSound",
                &[
                    Task::of(K::StopMoving),
                    Task::of(K::StoreLastPosition),
                    Task::of(K::GetPathToBestSound),
                    Task::of(K::FaceIdeal),
                    Task::of(K::WalkPath),
                    Task::of(K::WaitForMovement),
                    Task::play_activity(Activity::Inspect),
                    Task::wait(10.0),
                    Task::of(K::GetPathToLastPosition),
                    Task::of(K::WalkPath),
                    Task::of(K::WaitForMovement),
                    Task::of(K::ClearLastPosition),
                ],
                C::NEW_ENEMY | C::SEE_FEAR | DAMAGE | C::HEAR_SOUND,
                S::DANGER,
            ),
        ),
        (
            T::CombatFace,
            Schedule::fixed(
                "CombatFace",
                &[Task::of(K::StopMoving), Task::set_activity(Activity::Idle), Task::of(K::FaceEnemy)],
                C::CAN_ATTACK | C::NEW_ENEMY | C::ENEMY_DEAD,
                S::empty(),
            ),
        ),
        (
            T::CombatStand,
            Schedule::fixed(
                "CombatStand",
                &[Task::of(K::StopMoving), Task::set_activity(Activity::Idle), Task::of(K::WaitIndefinite)],
                C::NEW_ENEMY | C::ENEMY_DEAD | DAMAGE | C::CAN_ATTACK,
                S::empty(),
            ),
        ),
        (
            T::ChaseEnemy,
            Schedule::fixed(
                "ChaseEnemy",
                &[
                    Task::set_fail_schedule(T::ChaseEnemyFailed),
                    Task::of(K::GetPathToEnemy),
                    Task::of(K::RunPath),
                    Task::of(K::WaitForMovement),
                ],
                C::NEW_ENEMY | C::CAN_ATTACK | C::TASK_FAILED | C::HEAR_SOUND,
                S::DANGER,
            ),
        ),
        (
            T::ChaseEnemyFailed,
            cover("ChaseEnemyFailed", K::FindCoverFromEnemy, Task::of(K::FaceEnemy)),
        ),
        (
            T::VictoryDance,
            Schedule::fixed(
                "VictoryDance",
                &[Task::of(K::StopMoving), Task::play_activity(Activity::VictoryDance)],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::TargetFace,
            Schedule::fixed(
                "TargetFace",
                &[Task::of(K::StopMoving), Task::set_activity(Activity::Idle), Task::of(K::FaceTarget)],
                C::NEW_ENEMY | C::HEAR_SOUND,
                S::DANGER,
            ),
        ),
        (
            T::TargetChase,
            Schedule::fixed(
                "TargetChase",
                &[Task::of(K::GetPathToTarget), Task::of(K::RunPath), Task::of(K::WaitForMovement)],
                C::NEW_ENEMY | DAMAGE,
                S::empty(),
            ),
        ),
        (
            T::SmallFlinch,
            Schedule::fixed(
                "SmallFlinch",
                &[Task::remember(Memory::FLINCHED), Task::of(K::StopMoving), Task::of(K::SmallFlinch)],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::TakeCoverFromBestSound,
            Schedule::fixed(
                "TakeCoverFromBestSound",
                &[
                    Task::of(K::StopMoving),
                    Task::of(K::FindCoverFromBestSound),
                    Task::of(K::RunPath),
                    Task::of(K::WaitForMovement),
                    Task::remember(Memory::IN_COVER),
                    Task::new(K::TurnLeft, 179.0),
                ],
                C::NEW_ENEMY,
                S::empty(),
            ),
        ),
        (
            T::TakeCoverFromEnemy,
            cover("TakeCoverFromEnemy", K::FindCoverFromEnemy, Task::of(K::FaceEnemy)),
        ),
        (
            T::TakeCoverFromOrigin,
            cover("TakeCoverFromOrigin", K::FindCoverFromOrigin, Task::new(K::TurnLeft, 179.0)),
        ),
        (
            T::Cower,
            Schedule::fixed(
                "Cower",
                &[Task::of(K::StopMoving), Task::play_activity(Activity::Cower)],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::RangeAttack1,
            attack("RangeAttack1", K::RangeAttack1, C::NO_AMMO_LOADED | C::HEAR_SOUND, S::DANGER),
        ),
        (
            T::RangeAttack2,
            attack("RangeAttack2", K::RangeAttack2, C::HEAR_SOUND, S::DANGER),
        ),
        (T::MeleeAttack1, attack("MeleeAttack1", K::MeleeAttack1, C::empty(), S::empty())),
        (T::MeleeAttack2, attack("MeleeAttack2", K::MeleeAttack2, C::empty(), S::empty())),
        (
            T::Reload,
            Schedule::fixed(
                "Reload",
                &[Task::of(K::StopMoving), Task::of(K::Reload)],
                DAMAGE,
                S::empty(),
            ),
        ),
        (
            T::Standoff,
            Schedule::fixed(
                "Standoff",
                &[Task::of(K::StopMoving), Task::set_activity(Activity::Idle), Task::new(K::WaitFaceEnemy, 2.0)],
                C::CAN_ATTACK | C::ENEMY_DEAD | C::NEW_ENEMY | C::HEAR_SOUND,
                S::DANGER,
            ),
        ),
        (
            T::VictimGrab,
            Schedule::fixed(
                "VictimGrab",
                &[Task::of(K::StopMoving), Task::set_activity(Activity::Held), Task::of(K::WaitIndefinite)],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::AiScript,
            Schedule::fixed(
                "AiScript",
                &[
                    Task::of(K::StopMoving),
                    Task::of(K::GetPathToScriptMark),
                    Task::of(K::WalkPath),
                    Task::of(K::WaitForMovement),
                    Task::of(K::PlayScript),
                    Task::of(K::EndScript),
                ],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::Die,
            Schedule::fixed(
                "Die",
                &[Task::of(K::StopMoving), Task::new(K::Vocalize, voice::DIE), Task::of(K::Die)],
                C::empty(),
                S::empty(),
            ),
        ),
        (
            T::Fail,
            Schedule::fixed(
                "Fail",
                &[Task::of(K::StopMoving), Task::set_activity(Activity::Idle), Task::wait(2.0)],
                C::CAN_ATTACK,
                S::empty(),
            ),
        ),
    ]
}
