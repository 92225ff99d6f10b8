//! What a think hands back to the caller.

use npc_agent::Stimulus;
use npc_core::{AgentId, EntityRef, MonsterState, SolidId};
use npc_schedule::{Activity, Task};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttackKind {
    Range1,
    Range2,
    Melee1,
    Melee2,
}

/// An attack the caller should resolve as damage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Attack {
    pub attacker: AgentId,
    pub target:   AgentId,
    pub kind:     AttackKind,
    pub damage:   f32,
}

/// Observable transitions inside an agent's brain.
#[derive(Clone, Debug, PartialEq)]
pub enum BrainEvent {
    ScheduleChanged { agent: AgentId, from: Option<String>, to: String },
    /// Emitted once when the last task of a schedule completes.
    ScheduleCompleted { agent: AgentId, schedule: String },
    TaskFailed { agent: AgentId, schedule: String, task: Option<Task> },
    StateChanged { agent: AgentId, from: MonsterState, to: MonsterState },
    EnemyAcquired { agent: AgentId, enemy: AgentId },
    Vocalize { agent: AgentId, voice: f32 },
    AnimEvent { agent: AgentId, activity: Activity },
    Blocked { agent: AgentId, by: EntityRef },
}

/// Effects collected during one think and applied by the caller afterwards.
#[derive(Debug, Default)]
pub struct ThinkOutput {
    pub events:   Vec<BrainEvent>,
    pub sounds:   Vec<Stimulus>,
    pub barriers: Vec<SolidId>,
    pub attacks:  Vec<Attack>,
}

impl ThinkOutput {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.sounds.is_empty() && self.barriers.is_empty() && self.attacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.sounds.clear();
        self.barriers.clear();
        self.attacks.clear();
    }
}
