//! Value module - The debuggee value capability
//!
//! The printer never reads memory or resolves types itself. Everything it
//! knows about a value comes through the `ValueObject` trait defined here,
//! together with the formatter collaborators that can be attached to a value.

pub mod formatters;
pub mod synthetic;

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::core::MemoryError;

pub use formatters::{
    CStringSummary, ChildCountSummary, ChildFilter, ContiguousSynthetic, FnSummary, FnValidator, SummaryFlags,
    SummaryFormatter, SyntheticChildren, ValidationResult, Validator,
};
pub use synthetic::SyntheticValue;

/// Shared handle to a value node
pub type ValueObjectSP = Rc<dyn ValueObject>;

/// Errors reported by value collaborators. All of them are soft from the
/// printer's point of view: they end up as `<...>` annotations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("{0}")]
    Memory(#[from] MemoryError),

    #[error("could not resolve type")]
    InvalidType,

    #[error("no child at index {index}")]
    ChildIndex { index: usize },

    #[error("summary provider failed: {0}")]
    Summary(String),

    #[error("object description unavailable: {0}")]
    Description(String),

    #[error("out of scope")]
    OutOfScope,

    #[error("{0}")]
    Other(String),
}

bitflags::bitflags! {
    /// Classification of a value's static type
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TypeFlags: u32 {
        /// The value renders as a scalar string
        const HAS_VALUE = 1 << 0;
        /// The type can vend children
        const HAS_CHILDREN = 1 << 1;
        const IS_POINTER = 1 << 2;
        const IS_REFERENCE = 1 << 3;
        const IS_SCALAR = 1 << 4;
        /// Language builtin (int, char, ...)
        const IS_BUILTIN = 1 << 5;
        /// struct / class / union
        const IS_AGGREGATE = 1 << 6;
        const IS_ARRAY = 1 << 7;
        const IS_ENUM = 1 << 8;
        /// Object type whose instances are only reachable through pointers
        const INSTANCE_IS_POINTER = 1 << 9;
    }
}

/// Rendering format for scalar values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Default,
    Decimal,
    Hex,
    Binary,
    Char,
    /// Raw bytes as hex pairs
    Bytes,
    Boolean,
}

impl Format {
    /// Parse a single-letter format code (`x`, `d`, `b`, `c`, `y`, `B`)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "x" | "hex" => Some(Format::Hex),
            "d" | "decimal" => Some(Format::Decimal),
            "b" | "binary" => Some(Format::Binary),
            "c" | "char" => Some(Format::Char),
            "y" | "bytes" => Some(Format::Bytes),
            "B" | "bool" => Some(Format::Boolean),
            "default" => Some(Format::Default),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Default => "default",
            Format::Decimal => "decimal",
            Format::Hex => "hex",
            Format::Binary => "binary",
            Format::Char => "char",
            Format::Bytes => "bytes",
            Format::Boolean => "bool",
        };
        f.write_str(name)
    }
}

/// Capability interface for a debuggee value node.
///
/// Implementations are expected to be immutable for the duration of a print:
/// the printer caches facts derived from them.
pub trait ValueObject {
    /// Symbolic name (`x`, `[3]`, `*p`); empty for anonymous values
    fn name(&self) -> String;

    /// Fully qualified type name, or `None` if the type could not be resolved
    fn type_name(&self) -> Option<String>;

    /// Type name as the user would spell it
    fn display_type_name(&self) -> Option<String> {
        self.type_name()
    }

    fn type_flags(&self) -> TypeFlags;

    /// Where the value lives (address, register, ...)
    fn location(&self) -> String;

    /// Path expression that reaches this value from its root (`list.next->x`)
    fn expression_path(&self) -> String {
        self.name()
    }

    /// Refresh the value from the target
    fn update(&self) -> Result<(), ValueError> {
        Ok(())
    }

    fn is_in_scope(&self) -> bool {
        true
    }

    fn is_dynamic(&self) -> bool {
        false
    }

    /// Most-derived runtime representation, if different from this one
    fn dynamic_value(&self) -> Option<ValueObjectSP> {
        None
    }

    /// Static representation of a dynamic value
    fn static_value(&self) -> Option<ValueObjectSP> {
        None
    }

    fn is_synthetic(&self) -> bool {
        false
    }

    /// Representation with synthetic children substituted, if a provider exists
    fn synthetic_value(&self) -> Option<ValueObjectSP> {
        None
    }

    fn non_synthetic_value(&self) -> Option<ValueObjectSP> {
        None
    }

    /// Whether a synthetic provider supplies this value's scalar rendering
    fn provides_synthetic_value(&self) -> bool {
        false
    }

    fn num_children(&self) -> usize;

    /// Whether the value could vend children without counting them
    fn might_have_children(&self) -> bool {
        let flags = self.type_flags();
        if flags.is_empty() {
            self.num_children() > 0
        } else {
            flags.intersects(TypeFlags::HAS_CHILDREN | TypeFlags::IS_POINTER | TypeFlags::IS_REFERENCE)
        }
    }

    fn child_at_index(&self, index: usize) -> Result<ValueObjectSP, ValueError>;

    /// Element `index` when viewing a pointer as an array
    fn synthetic_array_member(&self, index: usize) -> Result<ValueObjectSP, ValueError> {
        Err(ValueError::ChildIndex { index })
    }

    /// Scalar rendering. `Ok(None)` means the value has no scalar form.
    fn value_as_string(&self, format: Format) -> Result<Option<String>, ValueError>;

    /// Format applied when none is requested
    fn default_format(&self) -> Format {
        Format::Default
    }

    /// Address held by a pointer or reference
    fn pointer_value(&self) -> Option<u64> {
        None
    }

    /// Null object reference (renders as `nil`)
    fn is_nil(&self) -> bool {
        false
    }

    /// Language-level "no payload" state, e.g. an empty optional
    fn is_uninitialized(&self) -> bool {
        false
    }

    fn summary_formatter(&self) -> Option<Rc<dyn SummaryFormatter>> {
        None
    }

    fn validator(&self) -> Option<Rc<dyn Validator>> {
        None
    }

    /// Runtime-provided free-form description
    fn object_description(&self) -> Result<Option<String>, ValueError> {
        Ok(None)
    }

    fn supports_object_description(&self) -> bool {
        false
    }
}

/// Render the best single-line form of a value: summary, then value.
/// Used for one-liner children and description fallbacks.
pub fn printable_representation(valobj: &dyn ValueObject, format: Format) -> Result<String, ValueError> {
    if let Some(formatter) = valobj.summary_formatter() {
        let summary = formatter.summarize(valobj)?;
        if !summary.is_empty() {
            return Ok(summary);
        }
    }
    Ok(valobj.value_as_string(format)?.unwrap_or_default())
}
