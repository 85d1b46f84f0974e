//! Printer module - Recursive, cycle-safe value rendering
//!
//! Renders a `ValueObject` tree the way a debugger's `frame variable` does:
//!
//! ```text
//! (Node *) head = 0x0000000000001000 {
//!   x = 1
//!   self = 0x0000000000001000 <already shown>
//! }
//! ```
//!
//! Each node goes through resolution, classification, validation,
//! value/summary, description and children stages. Soft failures are written
//! inline as `<...>` and never abort the rest of the print.

mod oneliner;
pub mod options;
mod value_printer;

#[cfg(test)]
mod tests;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use crate::core::Stream;
use crate::value::ValueObjectSP;

pub use oneliner::should_print_as_one_liner;
pub use options::{DeclPrintingHelper, DumpOptions, PointerAsArray, PointerDepth, PointerDepthMode};
pub use value_printer::{
    InstancePointerSet, InstancePointerSetSP, PrintContext, ValueObjectPrinter, ALREADY_SHOWN,
    CHILDREN_TRUNCATED, DEPTH_ELIDED,
};

/// Upper bound on dynamic/synthetic substitutions for a single value
const MAX_RESOLUTION_STEPS: usize = 8;

/// Follow dynamic-type and synthetic-children overrides until nothing
/// changes (or the step bound is hit). Returns `valobj` itself when no
/// override applies.
pub fn resolve_most_specialized(
    valobj: ValueObjectSP,
    use_dynamic: bool,
    use_synthetic: bool,
) -> ValueObjectSP {
    let mut current = valobj;
    for _ in 0..MAX_RESOLUTION_STEPS {
        let dynamic = match (current.is_dynamic(), use_dynamic) {
            (true, false) => current.static_value(),
            (false, true) => current.dynamic_value(),
            _ => None,
        };
        let next = dynamic.or_else(|| match (current.is_synthetic(), use_synthetic) {
            (true, false) => current.non_synthetic_value(),
            (false, true) => current.synthetic_value(),
            _ => None,
        });

        match next {
            Some(next) => current = next,
            None => return current,
        }
    }

    log::debug!(
        "Resolution of '{}' did not settle after {} steps",
        current.name(),
        MAX_RESOLUTION_STEPS
    );
    current
}

/// Print `valobj` into `stream`. Output written before a failure is kept.
/// Panics raised by collaborators (formatters, validators) are contained
/// and reported as a failed print.
pub fn print_value_object(valobj: &ValueObjectSP, stream: &mut Stream, options: &DumpOptions) -> bool {
    let indent_level = stream.indent_level();
    let result = catch_unwind(AssertUnwindSafe(|| {
        ValueObjectPrinter::new(Rc::clone(valobj), stream, options.clone()).print_value_object()
    }));

    match result {
        Ok(printed) => printed,
        Err(_) => {
            log::error!("Printing '{}' panicked; output is partial", valobj.name());
            stream.set_indent_level(indent_level);
            if !stream.at_line_start() {
                stream.eol();
            }
            false
        }
    }
}
