//! Synthetic values - a value seen through a synthetic children provider

use std::rc::Rc;

use super::{
    Format, SummaryFormatter, SyntheticChildren, TypeFlags, Validator, ValueError, ValueObject, ValueObjectSP,
};

/// Wraps a base value, substituting its children (and optionally its value)
/// with those vended by a `SyntheticChildren` provider. Everything else is
/// delegated to the base.
pub struct SyntheticValue {
    base: ValueObjectSP,
    provider: Rc<dyn SyntheticChildren>,
}

impl SyntheticValue {
    pub fn new(base: ValueObjectSP, provider: Rc<dyn SyntheticChildren>) -> Self {
        Self { base, provider }
    }
}

impl ValueObject for SyntheticValue {
    fn name(&self) -> String {
        self.base.name()
    }

    fn type_name(&self) -> Option<String> {
        self.base.type_name()
    }

    fn display_type_name(&self) -> Option<String> {
        self.base.display_type_name()
    }

    fn type_flags(&self) -> TypeFlags {
        self.base.type_flags()
    }

    fn location(&self) -> String {
        self.base.location()
    }

    fn expression_path(&self) -> String {
        self.base.expression_path()
    }

    fn update(&self) -> Result<(), ValueError> {
        self.base.update()
    }

    fn is_in_scope(&self) -> bool {
        self.base.is_in_scope()
    }

    fn is_dynamic(&self) -> bool {
        self.base.is_dynamic()
    }

    fn is_synthetic(&self) -> bool {
        true
    }

    fn non_synthetic_value(&self) -> Option<ValueObjectSP> {
        Some(Rc::clone(&self.base))
    }

    fn provides_synthetic_value(&self) -> bool {
        self.provider.provides_value()
    }

    fn num_children(&self) -> usize {
        self.provider.num_children(self.base.as_ref())
    }

    fn might_have_children(&self) -> bool {
        !self.provider.provides_value() || self.num_children() > 0
    }

    fn child_at_index(&self, index: usize) -> Result<ValueObjectSP, ValueError> {
        self.provider.child_at_index(self.base.as_ref(), index)
    }

    fn synthetic_array_member(&self, index: usize) -> Result<ValueObjectSP, ValueError> {
        self.base.synthetic_array_member(index)
    }

    fn value_as_string(&self, format: Format) -> Result<Option<String>, ValueError> {
        match self.provider.value(self.base.as_ref())? {
            Some(value) => Ok(Some(value)),
            None => self.base.value_as_string(format),
        }
    }

    fn default_format(&self) -> Format {
        self.base.default_format()
    }

    fn pointer_value(&self) -> Option<u64> {
        self.base.pointer_value()
    }

    fn is_nil(&self) -> bool {
        self.base.is_nil()
    }

    fn is_uninitialized(&self) -> bool {
        self.base.is_uninitialized()
    }

    fn summary_formatter(&self) -> Option<Rc<dyn SummaryFormatter>> {
        self.base.summary_formatter()
    }

    fn validator(&self) -> Option<Rc<dyn Validator>> {
        self.base.validator()
    }

    fn object_description(&self) -> Result<Option<String>, ValueError> {
        self.base.object_description()
    }

    fn supports_object_description(&self) -> bool {
        self.base.supports_object_description()
    }
}

impl std::fmt::Debug for SyntheticValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticValue")
            .field("name", &self.base.name())
            .field("type", &self.base.type_name())
            .finish_non_exhaustive()
    }
}
