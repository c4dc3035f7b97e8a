//! Quantifier expansion.
//!
//! Every quantifier is rewritten into copies of the compiled chunk:
//!
//! | bounds      | construction                                        |
//! |-------------|-----------------------------------------------------|
//! | `{1,1}`     | unchanged                                           |
//! | `{0,0}`     | empty chunk bridged by one epsilon edge             |
//! | `{0,s}`     | epsilon bridge glued with `{1,s}`                   |
//! | `{n,}`      | `n - 1` copies, then a looped copy                  |
//! | `{n,m}`     | `n` copies, then `m - n` escapable copies           |

use pathfa_core::LabelCondition;

use crate::ast::Quantifier;
use crate::chunk::GraphChunk;
use crate::error::CompileError;
use crate::state::StateArena;

/// Apply `quantifier` to a compiled chunk.
pub fn apply_quantifier(
    arena: &mut StateArena,
    mut chunk: GraphChunk,
    quantifier: Quantifier,
) -> Result<GraphChunk, CompileError> {
    let (inf, sup) = (quantifier.inf(), quantifier.sup());

    if inf == 0 {
        if sup == Some(0) {
            chunk.clean_graph(arena);
            let (start, end) = (chunk.start(), chunk.end());
            chunk.add_edge(arena, start, end, LabelCondition::Epsilon)?;
            return Ok(chunk);
        }
        let repeated = apply_quantifier(arena, chunk, Quantifier::new(1, sup)?)?;
        let mut bridge = GraphChunk::epsilon_bridge(arena);
        bridge.glue(arena, repeated)?;
        return Ok(bridge);
    }

    if quantifier.is_one() {
        return Ok(chunk);
    }
    if quantifier == Quantifier::PLUS {
        chunk.add_loop(arena)?;
        return Ok(chunk);
    }

    // Taken before any mutation: every further copy starts from the original.
    let template = chunk.copy_fresh(arena);

    match sup {
        None => {
            chunk.concat_copies(arena, inf - 2)?;
            let mut last = template;
            last.add_loop(arena)?;
            chunk.concat(arena, last)?;
        }
        Some(sup) => {
            chunk.concat_copies(arena, inf - 1)?;
            for _ in inf..sup {
                let mut optional = template.copy_fresh(arena);
                optional.add_escape(arena)?;
                chunk.concat(arena, optional)?;
            }
        }
    }
    Ok(chunk)
}
