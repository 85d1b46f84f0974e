//! One-liner qualification
//!
//! Decides whether an aggregate is small and flat enough to be rendered as
//! `(a = 1, b = 2)` on the line of its parent instead of as a block.

use super::{resolve_most_specialized, DumpOptions};
use crate::value::{TypeFlags, ValueObject};

/// Combined length of child names beyond which a value is never a one-liner
const MAX_TOTAL_NAME_LEN: usize = 50;

/// Nested one-liners stop qualifying below this many levels
const MAX_NESTING: u32 = 4;

/// Whether `valobj` should be printed on a single line. The child count
/// does not disqualify: long lists are capped like a block, ending in `...`.
pub fn should_print_as_one_liner(valobj: &dyn ValueObject, options: &DumpOptions) -> bool {
    qualifies(valobj, options, 0)
}

fn qualifies(valobj: &dyn ValueObject, options: &DumpOptions, nesting: u32) -> bool {
    // a summary always has the final word
    if let Some(summary) = valobj.summary_formatter() {
        return summary.is_one_liner();
    }

    let num_children = valobj.num_children();
    if num_children == 0 {
        return false;
    }

    // children past the cap are never shown
    let shown = if options.ignore_cap {
        num_children
    } else {
        num_children.min(options.max_children)
    };

    let mut total_name_len = 0;
    for idx in 0..shown {
        let child = match valobj.child_at_index(idx) {
            Ok(child) => resolve_most_specialized(child, options.use_dynamic, options.use_synthetic),
            Err(_) => return false,
        };

        // synthetic children that only vend a value are fine, anything
        // richer deserves a full expansion
        let mut is_synth_val = false;
        if child.is_synthetic() {
            if !child.might_have_children() && child.provides_synthetic_value() {
                is_synth_val = true;
            } else {
                return false;
            }
        }

        total_name_len += child.name().len();
        if total_name_len > MAX_TOTAL_NAME_LEN {
            return false;
        }

        let child_summary = child.summary_formatter();
        if let Some(summary) = &child_summary {
            if summary.prints_children(child.as_ref()) {
                return false;
            }
        }

        if child.num_children() > 0 && child_summary.is_none() && !is_synth_val {
            let nestable = options.oneliner_nested
                && nesting < MAX_NESTING
                && !child
                    .type_flags()
                    .intersects(TypeFlags::IS_POINTER | TypeFlags::IS_REFERENCE)
                && qualifies(child.as_ref(), options, nesting + 1);
            if !nestable {
                return false;
            }
        }
    }

    true
}
