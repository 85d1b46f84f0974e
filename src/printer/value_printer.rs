//! Value object printer - renders one node and recurses into its children

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use colored::Colorize;

use super::oneliner::should_print_as_one_liner;
use super::options::{DumpOptions, PointerDepth, PointerDepthMode};
use super::resolve_most_specialized;
use crate::core::{LazyBool, Stream};
use crate::value::{
    printable_representation, Format, SummaryFormatter, TypeFlags, ValidationResult, ValueError,
    ValueObjectSP,
};

/// Pointee identities already expanded during one top-level print
pub type InstancePointerSet = BTreeSet<u64>;
pub type InstancePointerSetSP = Rc<RefCell<InstancePointerSet>>;

/// Written in place of children for a pointee that was already expanded
pub const ALREADY_SHOWN: &str = "<already shown>";
/// Written in place of children once the depth limit is reached
pub const DEPTH_ELIDED: &str = "{...}";
/// Written after the last printed child when children were capped
pub const CHILDREN_TRUNCATED: &str = "...";

/// Recursion state handed from a printer to its children
#[derive(Debug, Clone)]
pub struct PrintContext {
    pub options: DumpOptions,
    /// Pointer hops still allowed below this node
    pub ptr_depth: PointerDepth,
    /// Aggregate nesting level of this node (root is 0)
    pub curr_depth: u32,
    pub printed_instance_pointers: InstancePointerSetSP,
}

impl PrintContext {
    /// Context for a top-level print: full budgets and a fresh cycle set
    pub fn root(options: DumpOptions) -> Self {
        Self {
            ptr_depth: options.max_ptr_depth,
            curr_depth: 0,
            options,
            printed_instance_pointers: Rc::new(RefCell::new(InstancePointerSet::new())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Annotation {
    Error,
    Elided,
    Marker,
}

/// Outcome of the object description stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Description {
    NotAttempted,
    Shown,
    Failed,
}

/// Prints a single value node. A fresh printer is built for every node,
/// children included; only the cycle set is shared between them.
pub struct ValueObjectPrinter<'s> {
    orig_valobj: ValueObjectSP,
    valobj: ValueObjectSP,
    resolved: bool,
    stream: &'s mut Stream,
    options: DumpOptions,
    type_flags: TypeFlags,
    has_valid_type: bool,
    ptr_depth: PointerDepth,
    curr_depth: u32,
    printed_instance_pointers: InstancePointerSetSP,

    should_print: LazyBool,
    is_nil: LazyBool,
    is_uninit: LazyBool,
    is_ptr: LazyBool,
    is_ref: LazyBool,
    is_aggregate: LazyBool,
    is_instance_ptr: LazyBool,

    summary_formatter: Option<Option<Rc<dyn SummaryFormatter>>>,
    value: String,
    summary: String,
    error: String,
    summary_error: String,
    val_summary_ok: bool,
    type_error: bool,
    description: Description,
    validation: Option<ValidationResult>,
}

impl<'s> ValueObjectPrinter<'s> {
    /// Printer for a top-level value
    pub fn new(valobj: ValueObjectSP, stream: &'s mut Stream, options: DumpOptions) -> Self {
        Self::with_context(valobj, stream, PrintContext::root(options))
    }

    /// Printer for a node somewhere inside a recursive print
    pub fn with_context(valobj: ValueObjectSP, stream: &'s mut Stream, ctx: PrintContext) -> Self {
        Self {
            orig_valobj: Rc::clone(&valobj),
            valobj,
            resolved: false,
            stream,
            options: ctx.options,
            type_flags: TypeFlags::empty(),
            has_valid_type: false,
            ptr_depth: ctx.ptr_depth,
            curr_depth: ctx.curr_depth,
            printed_instance_pointers: ctx.printed_instance_pointers,
            should_print: LazyBool::new(),
            is_nil: LazyBool::new(),
            is_uninit: LazyBool::new(),
            is_ptr: LazyBool::new(),
            is_ref: LazyBool::new(),
            is_aggregate: LazyBool::new(),
            is_instance_ptr: LazyBool::new(),
            summary_formatter: None,
            value: String::new(),
            summary: String::new(),
            error: String::new(),
            summary_error: String::new(),
            val_summary_ok: false,
            type_error: false,
            description: Description::NotAttempted,
            validation: None,
        }
    }

    /// Print the node and, as configured, its children. Returns `false` only
    /// when the value could not be printed at all.
    pub fn print_value_object(&mut self) -> bool {
        if !self.get_most_specialized_value() {
            return false;
        }
        log::trace!(
            "Printing '{}' (depth {}, ptr depth {})",
            self.valobj.name(),
            self.curr_depth,
            self.ptr_depth.count
        );

        if self.should_print_value_object() {
            self.print_validation_marker_if_needed();
            self.print_location_if_needed();
            self.stream.indent("");
            self.print_decl();
        }

        let (value_printed, summary_printed) = self.print_value_and_summary_if_needed();

        if self.val_summary_ok {
            self.print_children_if_needed(value_printed, summary_printed);
        } else {
            self.stream.eol();
        }

        self.print_validation_error_if_needed();
        !self.type_error
    }

    fn get_most_specialized_value(&mut self) -> bool {
        if self.resolved {
            return true;
        }

        let orig = Rc::clone(&self.orig_valobj);
        self.valobj = match orig.update() {
            Ok(()) => resolve_most_specialized(orig, self.options.use_dynamic, self.options.use_synthetic),
            Err(e) => {
                log::debug!("Could not update '{}': {}", orig.name(), e);
                orig
            }
        };

        self.type_flags = self.valobj.type_flags();
        self.has_valid_type = self.valobj.type_name().is_some();
        self.resolved = true;
        true
    }

    fn should_print_value_object(&self) -> bool {
        self.should_print
            .get(|| !self.options.flat_output || self.type_flags.contains(TypeFlags::HAS_VALUE))
    }

    fn is_nil(&self) -> bool {
        self.is_nil.get(|| self.valobj.is_nil())
    }

    fn is_uninitialized(&self) -> bool {
        self.is_uninit.get(|| self.valobj.is_uninitialized())
    }

    fn is_ptr(&self) -> bool {
        self.is_ptr.get(|| self.type_flags.contains(TypeFlags::IS_POINTER))
    }

    fn is_ref(&self) -> bool {
        self.is_ref.get(|| self.type_flags.contains(TypeFlags::IS_REFERENCE))
    }

    fn is_aggregate(&self) -> bool {
        self.is_aggregate.get(|| self.type_flags.contains(TypeFlags::HAS_CHILDREN))
    }

    /// Anonymous pointer (container element) or an object-reference type
    fn is_instance_pointer(&self) -> bool {
        self.is_instance_ptr.get(|| {
            if self.type_flags.contains(TypeFlags::INSTANCE_IS_POINTER) {
                return true;
            }
            if !(self.is_ptr() || self.is_ref()) {
                return false;
            }
            let name = self.valobj.name();
            name.is_empty() || name.starts_with('[')
        })
    }

    fn is_pointer_value(&self) -> bool {
        self.type_flags
            .intersects(TypeFlags::INSTANCE_IS_POINTER | TypeFlags::IS_POINTER)
            && !self.type_flags.contains(TypeFlags::IS_BUILTIN)
    }

    fn annotate(&self, text: &str, kind: Annotation) -> String {
        if !self.options.use_color {
            return text.to_string();
        }
        match kind {
            Annotation::Error => text.red().to_string(),
            Annotation::Elided => text.dimmed().to_string(),
            Annotation::Marker => text.yellow().bold().to_string(),
        }
    }

    fn error_annotation(&self, message: &str) -> String {
        self.annotate(&format!("<{}>", message), Annotation::Error)
    }

    fn print_validation_marker_if_needed(&mut self) -> bool {
        if !self.options.run_validator {
            return false;
        }

        let valobj = Rc::clone(&self.valobj);
        self.validation = valobj.validator().map(|v| v.validate(valobj.as_ref()));

        match &self.validation {
            Some(ValidationResult::Failure(_)) => {
                let marker = self.annotate("! ", Annotation::Marker);
                self.stream.put_str(&marker);
                true
            }
            Some(ValidationResult::Success) => match self.options.validation_pass_marker.clone() {
                Some(marker) => {
                    self.stream.put_str(&marker);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    fn print_validation_error_if_needed(&mut self) -> bool {
        if !self.options.run_validator {
            return false;
        }

        let message = match &self.validation {
            Some(ValidationResult::Failure(message)) if message.is_empty() => "unknown error".to_string(),
            Some(ValidationResult::Failure(message)) => message.clone(),
            _ => return false,
        };

        let text = self.annotate(&format!("! validation error: {}", message), Annotation::Marker);
        if self.stream.at_line_start() {
            self.stream.indent(&text);
        } else {
            self.stream.put_token(&text);
        }
        self.stream.eol();
        true
    }

    fn print_location_if_needed(&mut self) -> bool {
        if !self.options.show_location {
            return false;
        }
        let location = self.valobj.location();
        self.stream.put_str(&format!("{}: ", location));
        true
    }

    fn root_name_for_display(&self) -> String {
        match &self.options.root_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.valobj.name(),
        }
    }

    fn print_decl(&mut self) {
        let show_type = if self.curr_depth == 0 && self.options.hide_root_type {
            false
        } else {
            // types are always shown at the root unless output is flat
            self.options.show_types || (self.curr_depth == 0 && !self.options.flat_output)
        };

        let mut type_name = String::new();
        if show_type {
            let name = if self.has_valid_type {
                if self.options.use_type_display_name {
                    self.valobj.display_type_name()
                } else {
                    self.valobj.type_name()
                }
            } else if self.options.show_types {
                Some("<invalid type>".to_string())
            } else {
                None
            };

            if let Some(mut name) = name {
                if self.options.hide_pointer_value {
                    name = name.replace(" *", "");
                }
                type_name = name;
            }
        }

        let var_name = if self.options.hide_name {
            String::new()
        } else if self.options.flat_output {
            self.valobj.expression_path()
        } else {
            self.root_name_for_display()
        };

        if let Some(helper) = self.options.decl_printing_helper.clone() {
            let mut dest = Stream::new();
            if helper(&type_name, &var_name, &self.options, &mut dest) {
                self.stream.put_str(dest.as_str());
                return;
            }
        }

        let mut decl = String::new();
        if !type_name.is_empty() {
            decl.push_str(&format!("({})", type_name));
        }
        if !var_name.is_empty() || !self.options.hide_name {
            if !decl.is_empty() {
                decl.push(' ');
            }
            if !var_name.is_empty() {
                decl.push_str(&var_name);
                decl.push(' ');
            }
            decl.push('=');
        }
        self.stream.put_str(&decl);
    }

    fn check_scope_if_needed(&self) -> bool {
        self.options.scope_checked || self.valobj.is_in_scope()
    }

    fn get_summary_formatter(&mut self, null_if_omitted: bool) -> Option<Rc<dyn SummaryFormatter>> {
        if self.summary_formatter.is_none() {
            let entry = if self.options.omit_summary_depth > 0 {
                None
            } else {
                self.options
                    .summary
                    .clone()
                    .or_else(|| self.valobj.summary_formatter())
            };
            self.summary_formatter = Some(entry);
        }
        if self.options.omit_summary_depth > 0 && null_if_omitted {
            return None;
        }
        self.summary_formatter.clone().flatten()
    }

    fn get_value_summary_error(&mut self) {
        let valobj = Rc::clone(&self.valobj);
        let format = self.options.format;

        // pointer-as-array applies the format to the elements only
        let value = if self.options.element_count.is_enabled() {
            valobj.value_as_string(Format::Default)
        } else if format != Format::Default && format != valobj.default_format() {
            valobj.value_as_string(format)
        } else {
            valobj.value_as_string(Format::Default)
        };
        match value {
            Ok(Some(value)) => self.value = value,
            Ok(None) => {}
            Err(e) => self.error = e.to_string(),
        }

        if !self.should_print_value_object() {
            return;
        }

        if self.is_nil() {
            self.summary = "nil".to_string();
        } else if self.is_uninitialized() {
            self.summary = "<uninitialized>".to_string();
        } else if self.options.omit_summary_depth == 0 {
            if let Some(entry) = self.get_summary_formatter(true) {
                match entry.summarize(valobj.as_ref()) {
                    Ok(summary) => self.summary = summary,
                    Err(e) => {
                        log::debug!("Summary for '{}' failed: {}", valobj.name(), e);
                        self.summary_error = e.to_string();
                    }
                }
            }
        }
    }

    /// Returns `(value_printed, summary_printed)` and records in
    /// `val_summary_ok` whether printing may continue with children.
    fn print_value_and_summary_if_needed(&mut self) -> (bool, bool) {
        let mut value_printed = false;
        let mut summary_printed = false;
        self.val_summary_ok = true;

        if !self.should_print_value_object() {
            return (value_printed, summary_printed);
        }

        if !self.check_scope_if_needed() {
            self.error = ValueError::OutOfScope.to_string();
        }
        if self.error.is_empty() {
            self.get_value_summary_error();
        }

        if !self.error.is_empty() && self.summary.is_empty() {
            // an error without a type almost always means the type could not
            // be resolved; say so instead of the raw error
            if !self.has_valid_type {
                let text = self.error_annotation("could not resolve type");
                self.stream.put_token(&text);
                self.type_error = true;
            } else {
                let text = self.error_annotation(&self.error.clone());
                self.stream.put_token(&text);
                if !self.summary_error.is_empty() {
                    let text = self.error_annotation(&self.summary_error.clone());
                    self.stream.put_token(&text);
                }
            }
            self.val_summary_ok = false;
            return (value_printed, summary_printed);
        }

        let entry = self.get_summary_formatter(true);
        let valobj = Rc::clone(&self.valobj);
        let summary_allows_value = match &entry {
            None => true,
            Some(entry) => {
                entry.prints_value(valobj.as_ref())
                    || self.options.format != Format::Default
                    || self.summary.is_empty()
            }
        };

        if !self.is_nil()
            && !self.is_uninitialized()
            && !self.value.is_empty()
            && summary_allows_value
            && !self.options.hide_value
            && !(self.options.hide_pointer_value && self.is_pointer_value())
        {
            let value = self.value.clone();
            self.stream.put_token(&value);
            value_printed = true;
        }

        if !self.summary.is_empty() {
            let summary = self.summary.clone();
            self.stream.put_token(&summary);
            summary_printed = true;
        }

        for message in [self.error.clone(), self.summary_error.clone()] {
            if !message.is_empty() {
                let text = self.error_annotation(&message);
                self.stream.put_token(&text);
            }
        }

        (value_printed, summary_printed)
    }

    /// Returns `false` when a description was attempted and failed
    fn print_object_description_if_needed(&mut self, value_printed: bool, summary_printed: bool) -> bool {
        if !self.should_print_value_object()
            || !self.options.use_object_description
            || self.is_nil()
            || self.is_uninitialized()
            || self.options.element_count.is_enabled()
        {
            return true;
        }

        // pure scalars have nothing to add
        if self.type_flags.contains(TypeFlags::IS_SCALAR) && !self.is_ptr() && !self.is_aggregate() {
            return true;
        }

        let valobj = Rc::clone(&self.valobj);
        if !value_printed && !summary_printed && !valobj.supports_object_description() {
            return true;
        }

        let mut description = valobj.object_description();
        // with nothing on the line yet, the summary or value stands in
        if !value_printed && !summary_printed && !matches!(&description, Ok(Some(d)) if !d.is_empty()) {
            match printable_representation(valobj.as_ref(), self.options.format) {
                Ok(fallback) if !fallback.is_empty() => description = Ok(Some(fallback)),
                Ok(_) => {}
                Err(e) => log::debug!("No printable fallback for '{}': {}", valobj.name(), e),
            }
        }

        match description {
            Ok(Some(description)) if !description.is_empty() => {
                self.stream.put_token(&description);
                if !description.ends_with('\n') {
                    self.stream.eol();
                }
                self.description = Description::Shown;
                true
            }
            Ok(_) => {
                self.description = Description::Failed;
                false
            }
            Err(e) => {
                log::debug!("Object description for '{}' failed: {}", valobj.name(), e);
                let text = self.error_annotation(&e.to_string());
                self.stream.put_token(&text);
                self.description = Description::Failed;
                false
            }
        }
    }

    fn should_print_children(&mut self, is_failed_description: bool, curr_ptr_depth: PointerDepth) -> bool {
        if self.is_uninitialized() {
            return false;
        }

        // an explicit element count is user demand
        if self.options.element_count.is_enabled() {
            return true;
        }

        if self.description == Description::Shown {
            return false;
        }

        if !is_failed_description && self.curr_depth >= self.options.max_depth {
            return false;
        }

        if self.is_ptr() || self.is_ref() {
            if matches!(self.valobj.pointer_value(), None | Some(0)) {
                return false;
            }

            // a root reference shows what it refers to; deeper ones would
            // risk endless recursion
            if self.is_ref() && self.curr_depth == 0 {
                return true;
            }

            if curr_ptr_depth.can_allow_expansion() {
                return true;
            }
            return curr_ptr_depth.mode == PointerDepthMode::Default && self.is_instance_pointer();
        }

        let valobj = Rc::clone(&self.valobj);
        match self.get_summary_formatter(true) {
            None => true,
            Some(entry) => entry.prints_children(valobj.as_ref()) || self.summary.is_empty(),
        }
    }

    fn should_expand_empty_aggregates(&mut self) -> bool {
        match self.get_summary_formatter(true) {
            None => true,
            Some(entry) => entry.prints_empty_aggregates(),
        }
    }

    fn should_print_empty_brackets(&self, value_printed: bool, summary_printed: bool) -> bool {
        if !self.is_aggregate() {
            return false;
        }
        if !self.options.reveal_empty_aggregates && (value_printed || summary_printed) {
            return false;
        }
        if self.valobj.might_have_children() {
            return true;
        }
        !self.val_summary_ok
    }

    fn print_children_if_needed(&mut self, value_printed: bool, summary_printed: bool) {
        // a failed description falls back to showing children
        let is_failed_description = !self.print_object_description_if_needed(value_printed, summary_printed);
        if self.description == Description::Shown {
            if !self.stream.at_line_start() {
                self.stream.eol();
            }
            return;
        }

        let curr_ptr_depth = self.ptr_depth;
        let print_children = self.should_print_children(is_failed_description, curr_ptr_depth);

        if print_children && (self.is_ptr() || self.is_ref() || self.is_instance_pointer()) {
            if let Some(identity) = self.valobj.pointer_value() {
                let newly_inserted = self.printed_instance_pointers.borrow_mut().insert(identity);
                if !newly_inserted {
                    log::debug!(
                        "'{}' points at {:#x}, which was already printed",
                        self.valobj.name(),
                        identity
                    );
                    let text = self.annotate(ALREADY_SHOWN, Annotation::Elided);
                    self.stream.put_token(&text);
                    self.stream.eol();
                    return;
                }
            }
        }

        if print_children {
            if self.valobj.num_children() > 0 && self.should_print_one_liner(curr_ptr_depth) {
                self.stream.put_token("");
                self.print_children_one_liner(false);
                self.stream.eol();
            } else {
                self.print_children(value_printed, summary_printed, curr_ptr_depth);
            }
        } else if self.curr_depth >= self.options.max_depth
            && self.is_aggregate()
            && self.should_print_value_object()
        {
            log::trace!("Depth limit reached at '{}'", self.valobj.name());
            let text = self.annotate(DEPTH_ELIDED, Annotation::Elided);
            self.stream.put_token(&text);
            self.stream.eol();
        } else {
            self.stream.eol();
        }
    }

    fn should_print_one_liner(&self, curr_ptr_depth: PointerDepth) -> bool {
        if curr_ptr_depth.can_allow_expansion()
            || self.options.show_types
            || !self.options.allow_oneliner
            || self.options.flat_output
            || self.options.element_count.is_enabled()
            || self.options.show_location
        {
            return false;
        }
        should_print_as_one_liner(self.valobj.as_ref(), &self.options)
    }

    fn get_max_num_children_to_print(&self) -> (usize, bool) {
        if self.options.element_count.is_enabled() {
            return (self.options.element_count.count, false);
        }

        let num_children = self.valobj.num_children();
        if num_children > self.options.max_children && !self.options.ignore_cap {
            (self.options.max_children, true)
        } else {
            (num_children, false)
        }
    }

    fn generate_child(&self, idx: usize) -> Result<ValueObjectSP, ValueError> {
        if self.options.element_count.is_enabled() {
            let index = self.options.element_count.physical_index(idx);
            self.valobj.synthetic_array_member(index)
        } else {
            self.valobj.child_at_index(idx)
        }
    }

    fn print_children_preamble(&mut self) {
        if self.options.flat_output {
            if self.should_print_value_object() {
                self.stream.eol();
            }
        } else {
            if self.should_print_value_object() {
                if self.is_ref() {
                    self.stream.put_str(":");
                }
                self.stream.put_token("{");
                self.stream.eol();
            }
            self.stream.indent_more();
        }
    }

    fn print_children_postamble(&mut self, print_dotdotdot: bool) {
        if print_dotdotdot {
            let text = self.annotate(CHILDREN_TRUNCATED, Annotation::Elided);
            self.stream.indent(&text);
            self.stream.eol();
        }
        if !self.options.flat_output {
            self.stream.indent_less();
            self.stream.indent("}");
            self.stream.eol();
        }
    }

    fn print_child(&mut self, child: ValueObjectSP, curr_ptr_depth: PointerDepth) {
        let pointer_as_array = self.options.element_count.is_enabled();
        let consumes_ptr_depth = (self.is_ptr() && !pointer_as_array) || self.is_ref();
        // elements of a pointer-as-array sit at the pointer's own level
        let consumed_depth = if pointer_as_array { 0 } else { 1 };

        let ctx = PrintContext {
            options: self.options.for_child(consumed_depth),
            ptr_depth: if consumes_ptr_depth {
                curr_ptr_depth.decremented()
            } else {
                curr_ptr_depth
            },
            curr_depth: self.curr_depth + consumed_depth,
            printed_instance_pointers: Rc::clone(&self.printed_instance_pointers),
        };

        let mut child_printer = ValueObjectPrinter::with_context(child, &mut *self.stream, ctx);
        child_printer.print_value_object();
    }

    fn print_child_error(&mut self, idx: usize, error: &ValueError) {
        log::debug!("Child {} of '{}' unavailable: {}", idx, self.valobj.name(), error);
        let text = format!("[{}] = {}", idx, self.error_annotation(&error.to_string()));
        self.stream.indent(&text);
        self.stream.eol();
    }

    fn print_children(&mut self, value_printed: bool, summary_printed: bool, curr_ptr_depth: PointerDepth) {
        let (num_children, print_dotdotdot) = self.get_max_num_children_to_print();

        if num_children > 0 {
            self.print_children_preamble();
            for idx in 0..num_children {
                match self.generate_child(idx) {
                    Ok(child) => self.print_child(child, curr_ptr_depth),
                    Err(e) => self.print_child_error(idx, &e),
                }
            }
            self.print_children_postamble(print_dotdotdot);
        } else if self.should_print_empty_brackets(value_printed, summary_printed) {
            if self.should_print_value_object() {
                // synthetic values with no children exist only to vend a value
                if self.valobj.provides_synthetic_value() || !self.should_expand_empty_aggregates() {
                    self.stream.eol();
                } else {
                    self.stream.put_token("{}");
                    self.stream.eol();
                }
            }
        } else if self.should_print_value_object() {
            self.stream.eol();
        }
    }

    /// Print the children inline as `(a = 1, b = 2)`
    pub fn print_children_one_liner(&mut self, hide_names: bool) -> bool {
        if !self.get_most_specialized_value() {
            return false;
        }

        let (num_children, print_dotdotdot) = self.get_max_num_children_to_print();
        if num_children == 0 {
            return true;
        }

        self.stream.put_char('(');
        for idx in 0..num_children {
            if idx > 0 {
                self.stream.put_str(", ");
            }

            let child = match self.valobj.child_at_index(idx) {
                Ok(child) => resolve_most_specialized(child, self.options.use_dynamic, self.options.use_synthetic),
                Err(e) => {
                    let text = self.error_annotation(&e.to_string());
                    self.stream.put_str(&text);
                    continue;
                }
            };

            if !hide_names {
                let name = child.name();
                if !name.is_empty() {
                    self.stream.put_str(&name);
                    self.stream.put_str(" = ");
                }
            }

            let nested = self.options.oneliner_nested
                && child.num_children() > 0
                && child.summary_formatter().is_none()
                && !child.provides_synthetic_value()
                && !child
                    .type_flags()
                    .intersects(TypeFlags::IS_POINTER | TypeFlags::IS_REFERENCE);
            if nested {
                let ctx = PrintContext {
                    options: self.options.for_child(1),
                    ptr_depth: self.ptr_depth,
                    curr_depth: self.curr_depth + 1,
                    printed_instance_pointers: Rc::clone(&self.printed_instance_pointers),
                };
                ValueObjectPrinter::with_context(child, &mut *self.stream, ctx).print_children_one_liner(hide_names);
                continue;
            }

            match printable_representation(child.as_ref(), self.options.format) {
                Ok(text) if text.is_empty() && child.might_have_children() => {
                    let text = self.annotate(DEPTH_ELIDED, Annotation::Elided);
                    self.stream.put_str(&text);
                }
                Ok(text) => self.stream.put_str(&text),
                Err(e) => {
                    let text = self.error_annotation(&e.to_string());
                    self.stream.put_str(&text);
                }
            }
        }

        if print_dotdotdot {
            self.stream.put_str(", ...");
        }
        self.stream.put_char(')');
        true
    }
}
