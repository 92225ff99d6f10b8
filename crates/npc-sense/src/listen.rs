//! The listen pass and stimulus helpers.

use npc_agent::{Agent, Stimulus};
use npc_core::{Conditions, SoundTypes};

/// Rebuild `agent.senses.audible` from the active stimuli.
///
/// The agent attends to the classes in `species_mask`, narrowed to the
/// running schedule's mask when one is given.  A stimulus is picked up when
/// the agent's ear lies within `volume * sensitivity` of it.  Stimuli the
/// agent emitted itself are ignored.
pub fn listen(
    agent:         &mut Agent,
    stimuli:       &[Stimulus],
    species_mask:  SoundTypes,
    schedule_mask: Option<SoundTypes>,
    sensitivity:   f32,
) {
    agent.clear_conditions(Conditions::HEAR_SOUND | Conditions::SMELL | Conditions::SMELL_FOOD);
    agent.senses.audible.clear();
    agent.senses.sound_types = SoundTypes::empty();

    let mask = match schedule_mask {
        Some(m) => species_mask & m,
        None    => species_mask,
    };
    if mask.is_empty() {
        return;
    }

    let ear = agent.eye_position();
    let mut heard = Conditions::empty();

    for s in stimuli {
        if !mask.intersects(s.kind) || s.source == Some(agent.id) {
            continue;
        }
        if s.origin.distance(ear) > s.volume * sensitivity {
            continue;
        }
        if s.is_sound() {
            heard |= Conditions::HEAR_SOUND;
        } else if s.is_scent() {
            heard |= Conditions::SMELL;
            if s.kind.intersects(SoundTypes::FOOD) {
                heard |= Conditions::SMELL_FOOD;
            }
        }
        agent.senses.sound_types |= s.kind;
        agent.senses.audible.push(*s);
    }

    agent.set_conditions(heard);
}

/// Closest audible sound.
pub fn best_sound(agent: &Agent) -> Option<&Stimulus> {
    closest(agent, Stimulus::is_sound)
}

/// Closest audible scent.
pub fn best_scent(agent: &Agent) -> Option<&Stimulus> {
    closest(agent, Stimulus::is_scent)
}

fn closest(agent: &Agent, class: fn(&Stimulus) -> bool) -> Option<&Stimulus> {
    agent
        .senses
        .audible
        .iter()
        .filter(|s| class(s))
        .min_by(|a, b| a.origin.distance(agent.origin).total_cmp(&b.origin.distance(agent.origin)))
}

/// Drop stimuli that have run out at `now`; returns how many were removed.
pub fn expire_stimuli(stimuli: &mut Vec<Stimulus>, now: f32) -> usize {
    let before = stimuli.len();
    stimuli.retain(|s| s.expires_at > now);
    before - stimuli.len()
}
