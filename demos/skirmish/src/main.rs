//! skirmish: a grunt squad and a group of aliens meet in a walled arena.
//!
//! Grunts start on the west side of the wall, aliens patrol in from the
//! east through the door.  Every schedule, state and enemy change is logged
//! through `tracing`; run with `RUST_LOG=debug` to see schedule decisions
//! and `RUST_LOG=trace` for per-tick detail.
//!
//! ```text
//! cargo run -p skirmish [config.json]
//! ```
//!
//! The optional JSON file overrides any `EngineConfig` field, e.g.
//! `{ "seed": 7, "recruit_radius": 512.0 }`.

mod arena;
mod species;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use npc_agent::AgentBuilder;
use npc_behavior::{Attack, BrainEvent, SpeciesRegistry};
use npc_core::{AgentId, Classification, EngineConfig, Tick, Vec3};
use npc_schedule::ScheduleCatalog;
use npc_sim::{SimBuilder, SimObserver};

use arena::build_world;
use species::{Grunt, Slave};

// ── Constants ─────────────────────────────────────────────────────────────────

const GRUNT_COUNT: usize = 4;
const SLAVE_COUNT: usize = 3;
/// One simulated minute at the default tick length.
const MAX_TICKS:   u64   = 600;

// ── Schedule CSV ──────────────────────────────────────────────────────────────

// Species 0 is the grunt.  GruntSuppress is looked up by name from the
// grunt's `schedule_of_type`; GruntCover replaces the generic cover
// schedule for grunts only.
const SCHEDULE_CSV: &str = "\
schedule,type,species,fail,task,param,interrupts,sounds\n\
GruntSuppress,,,,StopMoving,,NEW_ENEMY | ENEMY_DEAD | LIGHT_DAMAGE | HEAVY_DAMAGE | CAN_RANGE_ATTACK1,DANGER\n\
GruntSuppress,,,,FaceEnemy,,,\n\
GruntSuppress,,,,WaitFaceEnemy,1.5,,\n\
GruntCover,TakeCoverFromEnemy,0,CombatFace,StopMoving,,NEW_ENEMY,\n\
GruntCover,,,,FindCoverFromEnemy,512,,\n\
GruntCover,,,,RunPath,,,\n\
GruntCover,,,,WaitForMovement,,,\n\
GruntCover,,,,Remember,IN_COVER,,\n\
GruntCover,,,,FaceEnemy,,,\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SkirmishLog {
    schedule_changes: usize,
    task_failures:    usize,
    shots:            usize,
    damage:           f32,
    deaths:           Vec<(Tick, AgentId)>,
}

impl SimObserver for SkirmishLog {
    fn on_event(&mut self, tick: Tick, event: &BrainEvent) {
        match event {
            BrainEvent::ScheduleChanged { agent, from, to } => {
                self.schedule_changes += 1;
                debug!(%tick, %agent, from = from.as_deref().unwrap_or("-"), %to, "schedule");
            }
            BrainEvent::TaskFailed { agent, schedule, task } => {
                self.task_failures += 1;
                debug!(%tick, %agent, %schedule, ?task, "task failed");
            }
            BrainEvent::StateChanged { agent, from, to } => {
                info!(%tick, %agent, ?from, ?to, "state");
            }
            BrainEvent::EnemyAcquired { agent, enemy } => {
                info!(%tick, %agent, %enemy, "enemy acquired");
            }
            _ => {}
        }
    }

    fn on_attack(&mut self, _tick: Tick, _attack: &Attack, dealt: f32) {
        self.shots += 1;
        self.damage += dealt;
    }

    fn on_death(&mut self, tick: Tick, agent: AgentId) {
        info!(%tick, %agent, "down");
        self.deaths.push((tick, agent));
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: EngineConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let arg = std::env::args().nth(1);
    let config = load_config(arg.as_deref().map(Path::new))?;
    info!(seed = config.seed, tick_secs = config.tick_secs, "configuration loaded");

    // 1. Species, in SpeciesId order.
    let mut registry = SpeciesRegistry::new();
    let grunt = registry.register(Grunt);
    let slave = registry.register(Slave);

    // 2. Catalog: generic defaults plus the grunt's own schedules.
    let mut catalog = ScheduleCatalog::with_defaults();
    let added = catalog.extend_from_reader(Cursor::new(SCHEDULE_CSV))?;
    info!(schedules = catalog.len(), custom = added, "schedule catalog ready");

    // 3. World and sim.
    let mut sim = SimBuilder::new(config, build_world()).catalog(catalog).species(registry).build()?;

    // 4. Combatants.
    let mut grunts = Vec::with_capacity(GRUNT_COUNT);
    for i in 0..GRUNT_COUNT {
        let y = -192.0 + i as f32 * 128.0;
        let b = AgentBuilder::new(grunt, Classification::HumanMilitary).origin(Vec3::new(-640.0, y, 0.0));
        grunts.push(sim.spawn(b)?);
    }
    let mut slaves = Vec::with_capacity(SLAVE_COUNT);
    for i in 0..SLAVE_COUNT {
        let y = -256.0 + i as f32 * 256.0;
        let b = AgentBuilder::new(slave, Classification::AlienMilitary)
            .origin(Vec3::new(640.0, y, 0.0))
            .yaw(180.0)
            .patrol(vec![Vec3::new(-512.0, 0.0, 0.0), Vec3::new(-768.0, 512.0, 0.0)]);
        slaves.push(sim.spawn(b)?);
    }
    info!(grunts = grunts.len(), slaves = slaves.len(), "spawned");

    // 5. Run until one side is gone or time runs out.
    let mut log = SkirmishLog::default();
    let start = Instant::now();
    let standing = |sim: &npc_sim::Sim<_>, side: &[AgentId]| side.iter().filter(|&&id| sim.arena.is_alive(id)).count();
    while sim.tick().0 < MAX_TICKS {
        sim.step(&mut log)?;
        if standing(&sim, &grunts) == 0 || standing(&sim, &slaves) == 0 {
            break;
        }
    }

    println!();
    println!("=== skirmish over at {} ===", sim.clock);
    println!("grunts standing: {}/{GRUNT_COUNT}", standing(&sim, &grunts));
    println!("aliens standing: {}/{SLAVE_COUNT}", standing(&sim, &slaves));
    println!("attacks: {}  damage: {:.0}  deaths: {}", log.shots, log.damage, log.deaths.len());
    println!("schedule changes: {}  task failures: {}", log.schedule_changes, log.task_failures);
    println!("wall time: {:.1} ms", start.elapsed().as_secs_f64() * 1e3);
    Ok(())
}
