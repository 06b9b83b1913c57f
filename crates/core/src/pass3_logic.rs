//! Pass 3: scenario/event logic.
//!
//! Walks each rank in textual order and marks every part active or not.
//! A part is active when every enclosing `If` block is on its taken branch
//! and the file it came from was itself referenced by an active part.

use std::collections::HashMap;

use tracing::debug;

use crate::ast::{LogicType, Provenance};
use crate::component::Components;
use crate::error::Warning;
use crate::parts::{LogicTerm, PartKind};
use crate::pass2_assemble::PartRef;
use crate::raw_file::{FileId, RawFileStore};
use crate::scenario::ScenarioEventContext;

struct Block {
    logic_type: LogicType,
    /// Some branch of the chain has been taken already.
    taken: bool,
    /// The branch currently being read is the taken one.
    current: bool,
    prov: Provenance,
    text: String,
}

/// Set `active` on every part. Returns warnings for unbalanced blocks.
pub fn apply_logic(
    components: &mut Components,
    order: &[Vec<PartRef>],
    store: &RawFileStore,
    ctx: &ScenarioEventContext,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    // (referencing file, line) -> whether the reference sits on a taken branch
    let mut gates: HashMap<(FileId, u32), bool> = HashMap::new();

    for rank_order in order {
        let mut stack: Vec<Block> = Vec::new();

        for r in rank_order {
            let part = &mut components.get_mut(r.component).parts[r.index];

            let (term, logic_type) = match &part.kind {
                PartKind::Logic { term, logic_type } => (Some(*term), *logic_type),
                _ => (None, None),
            };
            let taken = |lt: LogicType| part.values().iter().any(|v| ctx.is_active(lt, v));

            part.active = match term {
                Some(LogicTerm::If) => {
                    let enclosing = all_current(&stack);
                    let lt = logic_type.unwrap_or(LogicType::Scenario);
                    let hit = taken(lt);
                    stack.push(Block {
                        logic_type: lt,
                        taken: hit,
                        current: hit,
                        prov: part.source.clone(),
                        text: part.command.clone(),
                    });
                    enclosing
                }
                Some(LogicTerm::ElseIf) => match stack.last() {
                    Some(top) => {
                        let lt = logic_type.unwrap_or(top.logic_type);
                        let hit = !top.taken && taken(lt);
                        let enclosing = all_current(&stack[..stack.len() - 1]);
                        if let Some(top) = stack.last_mut() {
                            top.current = hit;
                            top.taken |= hit;
                        }
                        enclosing
                    }
                    None => {
                        warnings.push(Warning::unbalanced_logic(&part.source, &part.command));
                        all_current(&stack)
                    }
                },
                Some(LogicTerm::Else) => match stack.last_mut() {
                    Some(top) => {
                        top.current = !top.taken;
                        top.taken = true;
                        all_current(&stack[..stack.len() - 1])
                    }
                    None => {
                        warnings.push(Warning::unbalanced_logic(&part.source, &part.command));
                        true
                    }
                },
                Some(LogicTerm::EndIf) => {
                    if stack.pop().is_none() {
                        warnings.push(Warning::unbalanced_logic(&part.source, &part.command));
                    }
                    all_current(&stack)
                }
                None => all_current(&stack),
            };

            if part.kind == PartKind::ControlFile {
                gates.insert((part.origin, part.source.line), part.active);
            }
        }

        for block in stack {
            warnings.push(Warning::unbalanced_logic(&block.prov, &block.text));
        }
    }

    // Ranks do not follow the reference graph, so file gating waits until
    // every reference has been evaluated.
    let files = file_activity(store, &gates);
    for component in components.iter_mut() {
        for part in &mut component.parts {
            part.active &= files.get(part.origin.0).copied().unwrap_or(true);
        }
    }

    let inactive: usize = components.iter().map(|c| c.inactive_parts().count()).sum();
    debug!(inactive, context = %ctx, "applied scenario/event logic");
    warnings
}

/// Activity of every file, indexed by [`FileId`]. A file is active when the
/// reference that loaded it is on a taken branch of an active file.
fn file_activity(store: &RawFileStore, gates: &HashMap<(FileId, u32), bool>) -> Vec<bool> {
    let mut active: Vec<bool> = Vec::with_capacity(store.len());
    // Discovery is pre-order, so a parent always precedes its children.
    for file in store.files() {
        let on = match &file.parent {
            Some(parent) => {
                active.get(parent.file.0).copied().unwrap_or(true)
                    && gates.get(&(parent.file, parent.line)).copied().unwrap_or(true)
            }
            None => true,
        };
        active.push(on);
    }
    active
}

fn all_current(blocks: &[Block]) -> bool {
    blocks.iter().all(|b| b.current)
}
