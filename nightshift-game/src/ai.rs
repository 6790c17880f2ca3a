//! Entity movement: per-tick aggression rolls along fixed path graphs.
use smallvec::SmallVec;

use crate::constants::PEEK_STAGE_MAX;
use crate::entity::{EntityId, path_for};
use crate::night::NightEvent;
use crate::rng::NightRng;
use crate::state::NightState;

/// Run one round of movement rolls for every entity that can act. Entities
/// already at a door sentinel hold position; the door resolver owns them.
pub(crate) fn run_movement_rolls(
    state: &mut NightState,
    rng: &NightRng,
    events: &mut SmallVec<[NightEvent; 4]>,
) {
    for id in EntityId::ALL {
        let entity = state.entity(id);
        if entity.aggression == 0 || entity.at_door() {
            continue;
        }
        let roll = rng.roll_d20();
        if roll > entity.aggression {
            continue;
        }

        let path = path_for(id);
        let Some(index) = entity.path_index() else {
            continue;
        };
        if index + 1 >= path.len() {
            continue;
        }
        let next = path[index + 1];

        // Staged entities bank peeks at the node before the sentinel and
        // only dash once the sequence completes.
        let entity = state.entity_mut(id);
        if next.door_side().is_some()
            && let Some(stage) = entity.peek_stage
        {
            if stage < PEEK_STAGE_MAX {
                entity.peek_stage = Some(stage + 1);
                events.push(NightEvent::EntityPeeked {
                    id,
                    stage: stage + 1,
                });
                continue;
            }
            entity.peek_stage = Some(0);
        }
        entity.location = next;
        entity.door_timer = 0;
        events.push(NightEvent::EntityAdvanced { id, to: next });
    }
}
