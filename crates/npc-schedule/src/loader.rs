//! CSV schedule loader.
//!
//! # CSV format
//!
//! One row per task.  Consecutive rows with the same `schedule` name form one
//! schedule, in row order.  The `type`, `species`, `fail`, `interrupts` and
//! `sounds` columns are read from a schedule's first row only and may be left
//! empty on the rest.
//!
//! ```csv
//! schedule,type,species,fail,task,param,interrupts,sounds
//! GruntCover,TakeCoverFromEnemy,3,CombatFace,StopMoving,,NEW_ENEMY,
//! GruntCover,,,,FindCoverFromEnemy,512,,
//! GruntCover,,,,RunPath,,,
//! GruntCover,,,,WaitForMovement,,,
//! GruntCover,,,,Remember,IN_COVER,,
//! Sweep,,,,SetActivity,Walk,NEW_ENEMY | HEAR_SOUND,COMBAT | DANGER
//! Sweep,,,,Wait,3,,
//! ```
//!
//! | Column       | Meaning                                                     |
//! |--------------|-------------------------------------------------------------|
//! | `type`       | register as this `ScheduleType` (empty: by name only)       |
//! | `species`    | per-species registration (empty: generic)                   |
//! | `fail`       | `ScheduleType` to continue with when this schedule fails    |
//! | `param`      | number, or a symbolic name for activity / memory / schedule type / state params |
//! | `interrupts` | `Conditions` flag names joined with `|`                     |
//! | `sounds`     | `SoundTypes` flag names joined with `|`                     |

use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use npc_core::{Conditions, Memory, MonsterState, SoundTypes, SpeciesId};

use crate::schedule::{Schedule, ScheduleRef, ScheduleType};
use crate::task::{Activity, ParamMeaning, Task, TaskKind};
use crate::{ScheduleError, ScheduleResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ScheduleRecord {
    schedule:   String,
    #[serde(rename = "type")]
    ty:         Option<String>,
    species:    Option<u16>,
    fail:       Option<String>,
    task:       String,
    param:      Option<String>,
    interrupts: Option<String>,
    sounds:     Option<String>,
}

/// One schedule read from CSV plus where it should be registered.
#[derive(Clone, Debug)]
pub struct LoadedSchedule {
    pub schedule: ScheduleRef,
    pub ty:       Option<ScheduleType>,
    pub species:  Option<SpeciesId>,
    pub fail:     Option<ScheduleType>,
}

/// Schedule being assembled from consecutive rows.
struct Pending {
    name:       String,
    ty:         Option<ScheduleType>,
    species:    Option<SpeciesId>,
    fail:       Option<ScheduleType>,
    interrupts: Conditions,
    sounds:     SoundTypes,
    tasks:      Vec<Task>,
}

impl Pending {
    fn finish(self) -> ScheduleResult<LoadedSchedule> {
        let schedule = Schedule::new(self.name, self.tasks, self.interrupts, self.sounds)?;
        Ok(LoadedSchedule {
            schedule: Arc::new(schedule),
            ty:       self.ty,
            species:  self.species,
            fail:     self.fail,
        })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load schedules from a CSV file.
pub fn load_schedules_csv(path: &Path) -> ScheduleResult<Vec<LoadedSchedule>> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_schedules_reader(file)
}

/// Like [`load_schedules_csv`] but accepts any `Read` source.
pub fn load_schedules_reader<R: Read>(reader: R) -> ScheduleResult<Vec<LoadedSchedule>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut out = Vec::new();
    let mut pending: Option<Pending> = None;

    for result in csv_reader.deserialize::<ScheduleRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;

        if pending.as_ref().is_none_or(|p| p.name != row.schedule) {
            if let Some(done) = pending.take() {
                out.push(done.finish()?);
            }
            pending = Some(start_schedule(&row)?);
        }
        if let Some(p) = pending.as_mut() {
            let task = parse_task(&p.name, &row.task, row.param.as_deref())?;
            p.tasks.push(task);
        }
    }
    if let Some(done) = pending {
        out.push(done.finish()?);
    }

    tracing::debug!(schedules = out.len(), "loaded schedules from CSV");
    Ok(out)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn start_schedule(row: &ScheduleRecord) -> ScheduleResult<Pending> {
    Ok(Pending {
        name:       row.schedule.clone(),
        ty:         row.ty.as_deref().map(parse_schedule_type).transpose()?,
        species:    row.species.map(SpeciesId),
        fail:       row.fail.as_deref().map(parse_schedule_type).transpose()?,
        interrupts: parse_flags::<Conditions>(row.interrupts.as_deref())?,
        sounds:     parse_flags::<SoundTypes>(row.sounds.as_deref())?,
        tasks:      Vec::new(),
    })
}

fn parse_schedule_type(s: &str) -> ScheduleResult<ScheduleType> {
    ScheduleType::from_str(s)
        .map_err(|_| ScheduleError::Parse(format!("unknown schedule type {s:?}")))
}

fn parse_flags<F>(s: Option<&str>) -> ScheduleResult<F>
where
    F: bitflags::Flags,
    F::Bits: bitflags::parser::ParseHex,
{
    match s.map(str::trim) {
        None | Some("") => Ok(F::empty()),
        Some(text) => bitflags::parser::from_str::<F>(text)
            .map_err(|e| ScheduleError::Parse(format!("bad flag list {text:?}: {e}"))),
    }
}

fn parse_task(schedule: &str, kind: &str, param: Option<&str>) -> ScheduleResult<Task> {
    let kind = TaskKind::from_str(kind).map_err(|_| ScheduleError::UnknownTask(kind.to_owned()))?;
    let raw = param.map(str::trim).unwrap_or("");
    let bad = || ScheduleError::BadParam {
        schedule: schedule.to_owned(),
        task:     kind.to_string(),
        param:    raw.to_owned(),
    };

    if raw.is_empty() {
        return Ok(Task::of(kind));
    }
    if let Ok(n) = raw.parse::<f32>() {
        return Ok(Task::new(kind, n));
    }

    // Symbolic parameter.
    let value = match kind.param_meaning() {
        ParamMeaning::Activity => Activity::from_str(raw).map(|a| a as u8 as f32).map_err(|_| bad())?,
        ParamMeaning::ScheduleType => ScheduleType::from_str(raw).map(|t| t as u16 as f32).map_err(|_| bad())?,
        ParamMeaning::StateId => MonsterState::from_str(raw).map(|s| s as u8 as f32).map_err(|_| bad())?,
        ParamMeaning::MemoryBit => {
            let flag = bitflags::parser::from_str::<Memory>(raw).map_err(|_| bad())?;
            if flag.bits().count_ones() != 1 {
                return Err(bad());
            }
            flag.bits().trailing_zeros() as f32
        }
        _ => return Err(bad()),
    };
    Ok(Task::new(kind, value))
}
