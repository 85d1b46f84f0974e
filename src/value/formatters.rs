//! Formatters - Summary, validator and synthetic children collaborators
//!
//! These are attached to values (usually per type) and consulted by the
//! printer. Any of them may fail; failures are reported as `ValueError` and
//! rendered inline rather than aborting a print.

use std::rc::Rc;

use super::{ValueError, ValueObject, ValueObjectSP};
use crate::core::MemoryImage;

/// Behavior switches shared by all summary formatters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryFlags {
    /// Print the raw value in front of the summary
    pub show_value: bool,
    /// Expand children after the summary ("summary {children}")
    pub show_children: bool,
    /// Render `{}` for an aggregate with no children
    pub expand_empty: bool,
    /// The summary is short enough to use inside one-line children
    pub one_liner: bool,
}

impl SummaryFlags {
    pub const fn new() -> Self {
        Self {
            show_value: true,
            show_children: false,
            expand_empty: true,
            one_liner: false,
        }
    }

    pub const fn with_value(mut self, show: bool) -> Self {
        self.show_value = show;
        self
    }

    pub const fn with_children(mut self, show: bool) -> Self {
        self.show_children = show;
        self
    }

    pub const fn with_empty_expansion(mut self, expand: bool) -> Self {
        self.expand_empty = expand;
        self
    }

    pub const fn with_one_liner(mut self, one_liner: bool) -> Self {
        self.one_liner = one_liner;
        self
    }
}

impl Default for SummaryFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces a human readable one-line string for a whole value
pub trait SummaryFormatter {
    fn summarize(&self, valobj: &dyn ValueObject) -> Result<String, ValueError>;

    fn flags(&self) -> SummaryFlags {
        SummaryFlags::default()
    }

    /// Whether the raw value is still printed next to the summary
    fn prints_value(&self, _valobj: &dyn ValueObject) -> bool {
        self.flags().show_value
    }

    /// Whether children are expanded after the summary
    fn prints_children(&self, _valobj: &dyn ValueObject) -> bool {
        self.flags().show_children
    }

    fn prints_empty_aggregates(&self) -> bool {
        self.flags().expand_empty
    }

    fn is_one_liner(&self) -> bool {
        self.flags().one_liner
    }
}

type SummaryFn = dyn Fn(&dyn ValueObject) -> Result<String, ValueError>;

/// Summary backed by a closure
pub struct FnSummary {
    func: Box<SummaryFn>,
    flags: SummaryFlags,
}

impl FnSummary {
    pub fn new(func: impl Fn(&dyn ValueObject) -> Result<String, ValueError> + 'static) -> Self {
        Self {
            func: Box::new(func),
            flags: SummaryFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: SummaryFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl SummaryFormatter for FnSummary {
    fn summarize(&self, valobj: &dyn ValueObject) -> Result<String, ValueError> {
        (self.func)(valobj)
    }

    fn flags(&self) -> SummaryFlags {
        self.flags
    }
}

/// Summary for `char *`: reads the pointed-to string from target memory
pub struct CStringSummary {
    memory: Rc<MemoryImage>,
    max_len: usize,
}

impl CStringSummary {
    /// Longest string read before giving up on a terminator
    pub const DEFAULT_MAX_LEN: usize = 1024;

    pub fn new(memory: Rc<MemoryImage>) -> Self {
        Self {
            memory,
            max_len: Self::DEFAULT_MAX_LEN,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl SummaryFormatter for CStringSummary {
    fn summarize(&self, valobj: &dyn ValueObject) -> Result<String, ValueError> {
        let address = valobj
            .pointer_value()
            .ok_or_else(|| ValueError::Summary("not a pointer".into()))?;
        if address == 0 {
            return Ok(String::new());
        }
        let text = self.memory.read_c_string(address, self.max_len)?;
        Ok(format!("{:?}", text))
    }

    fn flags(&self) -> SummaryFlags {
        SummaryFlags::new().with_one_liner(true)
    }
}

/// `size=N` summary for containers; children are still shown
pub struct ChildCountSummary;

impl SummaryFormatter for ChildCountSummary {
    fn summarize(&self, valobj: &dyn ValueObject) -> Result<String, ValueError> {
        Ok(format!("size={}", valobj.num_children()))
    }

    fn flags(&self) -> SummaryFlags {
        SummaryFlags::new()
            .with_value(false)
            .with_children(true)
            .with_one_liner(true)
    }
}

/// Outcome of running a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Success,
    Failure(String),
}

impl ValidationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success)
    }
}

/// Checks a value's invariants (e.g. `size <= capacity`)
pub trait Validator {
    fn validate(&self, valobj: &dyn ValueObject) -> ValidationResult;
}

type ValidatorFn = dyn Fn(&dyn ValueObject) -> ValidationResult;

/// Validator backed by a closure
pub struct FnValidator {
    func: Box<ValidatorFn>,
}

impl FnValidator {
    pub fn new(func: impl Fn(&dyn ValueObject) -> ValidationResult + 'static) -> Self {
        Self {
            func: Box::new(func),
        }
    }
}

impl Validator for FnValidator {
    fn validate(&self, valobj: &dyn ValueObject) -> ValidationResult {
        (self.func)(valobj)
    }
}

/// Replaces the raw child layout of a value with a logical one
pub trait SyntheticChildren {
    fn num_children(&self, valobj: &dyn ValueObject) -> usize;

    fn child_at_index(
        &self,
        valobj: &dyn ValueObject,
        index: usize,
    ) -> Result<ValueObjectSP, ValueError>;

    /// Whether the provider exists only to vend a value (no children)
    fn provides_value(&self) -> bool {
        false
    }

    /// Scalar rendering vended by the provider
    fn value(&self, _valobj: &dyn ValueObject) -> Result<Option<String>, ValueError> {
        Ok(None)
    }
}

/// Shows only the named children, in the given order
pub struct ChildFilter {
    names: Vec<String>,
}

impl ChildFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    fn find(&self, valobj: &dyn ValueObject, name: &str) -> Option<ValueObjectSP> {
        (0..valobj.num_children())
            .filter_map(|i| valobj.child_at_index(i).ok())
            .find(|child| child.name() == name)
    }
}

impl SyntheticChildren for ChildFilter {
    fn num_children(&self, _valobj: &dyn ValueObject) -> usize {
        self.names.len()
    }

    fn child_at_index(
        &self,
        valobj: &dyn ValueObject,
        index: usize,
    ) -> Result<ValueObjectSP, ValueError> {
        let name = self
            .names
            .get(index)
            .ok_or(ValueError::ChildIndex { index })?;
        self.find(valobj, name)
            .ok_or_else(|| ValueError::Other(format!("no member named '{}'", name)))
    }
}

/// Vector-like layout: `len` elements stored behind the `data` pointer.
/// Children are the elements, named `[0]`, `[1]`, ...
pub struct ContiguousSynthetic {
    data_field: String,
    len_field: String,
}

impl ContiguousSynthetic {
    pub fn new(data_field: impl Into<String>, len_field: impl Into<String>) -> Self {
        Self {
            data_field: data_field.into(),
            len_field: len_field.into(),
        }
    }

    fn member(&self, valobj: &dyn ValueObject, name: &str) -> Result<ValueObjectSP, ValueError> {
        (0..valobj.num_children())
            .filter_map(|i| valobj.child_at_index(i).ok())
            .find(|child| child.name() == name)
            .ok_or_else(|| ValueError::Other(format!("no member named '{}'", name)))
    }

    fn len(&self, valobj: &dyn ValueObject) -> Result<usize, ValueError> {
        let len = self.member(valobj, &self.len_field)?;
        let text = len
            .value_as_string(super::Format::Decimal)?
            .ok_or_else(|| ValueError::Other(format!("'{}' has no value", self.len_field)))?;
        text.parse()
            .map_err(|_| ValueError::Other(format!("'{}' is not a length: {}", self.len_field, text)))
    }
}

impl SyntheticChildren for ContiguousSynthetic {
    fn num_children(&self, valobj: &dyn ValueObject) -> usize {
        match self.len(valobj) {
            Ok(len) => len,
            Err(e) => {
                log::debug!("Cannot size '{}': {}", valobj.name(), e);
                0
            }
        }
    }

    fn child_at_index(
        &self,
        valobj: &dyn ValueObject,
        index: usize,
    ) -> Result<ValueObjectSP, ValueError> {
        self.member(valobj, &self.data_field)?
            .synthetic_array_member(index)
    }
}
