//! Target Module
//!
//! Simulated debuggee the printer can be pointed at:
//! - A `MemoryImage` holding the process bytes
//! - A `TypeTable` describing the static types
//! - Named variables placed in that memory
//! - Formatters (summaries, validators, synthetic children, descriptions)
//!   registered per type name

pub mod demo;
pub mod types;
mod value;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::core::{MemoryError, MemoryImage, MemoryProtection};
use crate::value::{SummaryFormatter, SyntheticChildren, Validator, ValueError, ValueObject, ValueObjectSP};

pub use types::{Field, ScalarEncoding, TypeDecl, TypeId, TypeKind, TypeTable, OPTIONAL_PAYLOAD_OFFSET, POINTER_SIZE};
pub use value::TargetValue;

/// Errors raised while laying out a target
#[derive(Error, Debug)]
pub enum TargetError {
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("Unknown type id {0}")]
    UnknownType(TypeId),

    #[error("Variable '{0}' is already defined")]
    DuplicateVariable(String),

    #[error("Short write at {address:#x}: {written} of {wanted} bytes")]
    ShortWrite {
        address: u64,
        wanted: usize,
        written: usize,
    },
}

/// Runtime description provider (`po`-style)
pub type DescriptionFn = dyn Fn(&dyn ValueObject) -> Result<Option<String>, ValueError>;

/// A named variable of the debuggee
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub ty: TypeId,
    pub address: u64,
    pub in_scope: bool,
}

#[derive(Default)]
struct FormatterRegistry {
    summaries: HashMap<String, Rc<dyn SummaryFormatter>>,
    validators: HashMap<String, Rc<dyn Validator>>,
    synthetics: HashMap<String, Rc<dyn SyntheticChildren>>,
    descriptions: HashMap<String, Rc<DescriptionFn>>,
}

/// A laid-out debuggee. Values handed out keep the target alive.
pub struct Target {
    memory: Rc<MemoryImage>,
    types: TypeTable,
    variables: Vec<Variable>,
    /// Most-derived struct type of the object at an address
    dynamic_types: HashMap<u64, TypeId>,
    registry: RefCell<FormatterRegistry>,
}

impl Target {
    pub fn memory(&self) -> &Rc<MemoryImage> {
        &self.memory
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Value for the variable called `name`
    pub fn variable(self: &Rc<Self>, name: &str) -> Option<ValueObjectSP> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| self.value_for(v))
    }

    /// Values for every variable, in declaration order
    pub fn all_variables(self: &Rc<Self>) -> Vec<ValueObjectSP> {
        self.variables.iter().map(|v| self.value_for(v)).collect()
    }

    fn value_for(self: &Rc<Self>, var: &Variable) -> ValueObjectSP {
        Rc::new(TargetValue::root(Rc::clone(self), var))
    }

    pub fn dynamic_type_at(&self, address: u64) -> Option<TypeId> {
        self.dynamic_types.get(&address).copied()
    }

    /// Attach a summary to every value whose type is named `type_name`
    pub fn add_summary(&self, type_name: &str, summary: Rc<dyn SummaryFormatter>) {
        log::debug!("Registered summary for '{}'", type_name);
        self.registry.borrow_mut().summaries.insert(type_name.to_string(), summary);
    }

    pub fn add_validator(&self, type_name: &str, validator: Rc<dyn Validator>) {
        log::debug!("Registered validator for '{}'", type_name);
        self.registry.borrow_mut().validators.insert(type_name.to_string(), validator);
    }

    pub fn add_synthetic(&self, type_name: &str, provider: Rc<dyn SyntheticChildren>) {
        log::debug!("Registered synthetic children for '{}'", type_name);
        self.registry.borrow_mut().synthetics.insert(type_name.to_string(), provider);
    }

    pub fn add_description(&self, type_name: &str, description: Rc<DescriptionFn>) {
        log::debug!("Registered object description for '{}'", type_name);
        self.registry
            .borrow_mut()
            .descriptions
            .insert(type_name.to_string(), description);
    }

    pub(crate) fn summary_for(&self, type_name: &str) -> Option<Rc<dyn SummaryFormatter>> {
        self.registry.borrow().summaries.get(type_name).cloned()
    }

    pub(crate) fn validator_for(&self, type_name: &str) -> Option<Rc<dyn Validator>> {
        self.registry.borrow().validators.get(type_name).cloned()
    }

    pub(crate) fn synthetic_for(&self, type_name: &str) -> Option<Rc<dyn SyntheticChildren>> {
        self.registry.borrow().synthetics.get(type_name).cloned()
    }

    pub(crate) fn description_for(&self, type_name: &str) -> Option<Rc<DescriptionFn>> {
        self.registry.borrow().descriptions.get(type_name).cloned()
    }
}

/// Lays out memory, types and variables, then freezes them into a `Target`
#[derive(Default)]
pub struct TargetBuilder {
    memory: MemoryImage,
    types: TypeTable,
    variables: Vec<Variable>,
    dynamic_types: HashMap<u64, TypeId>,
}

impl TargetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    /// Map a zero-filled, read-write region
    pub fn map(&mut self, base_address: u64, size: usize, name: &str) -> Result<(), TargetError> {
        self.memory
            .map(base_address, vec![0; size], MemoryProtection::RW, Some(name))?;
        Ok(())
    }

    /// Map a region with explicit contents and protection
    pub fn map_bytes(
        &mut self,
        base_address: u64,
        bytes: Vec<u8>,
        protection: MemoryProtection,
        name: &str,
    ) -> Result<(), TargetError> {
        self.memory.map(base_address, bytes, protection, Some(name))?;
        Ok(())
    }

    pub fn write(&mut self, address: u64, data: &[u8]) -> Result<(), TargetError> {
        let written = self.memory.write(address, data)?;
        if written < data.len() {
            return Err(TargetError::ShortWrite {
                address,
                wanted: data.len(),
                written,
            });
        }
        Ok(())
    }

    pub fn write_u64(&mut self, address: u64, value: u64) -> Result<(), TargetError> {
        self.write(address, &value.to_le_bytes())
    }

    pub fn write_u32(&mut self, address: u64, value: u32) -> Result<(), TargetError> {
        self.write(address, &value.to_le_bytes())
    }

    pub fn write_i32(&mut self, address: u64, value: i32) -> Result<(), TargetError> {
        self.write(address, &value.to_le_bytes())
    }

    pub fn write_u8(&mut self, address: u64, value: u8) -> Result<(), TargetError> {
        self.write(address, &[value])
    }

    pub fn write_f64(&mut self, address: u64, value: f64) -> Result<(), TargetError> {
        self.write(address, &value.to_le_bytes())
    }

    /// Write a NUL-terminated string
    pub fn write_c_string(&mut self, address: u64, text: &str) -> Result<(), TargetError> {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.write(address, &bytes)
    }

    /// Declare a variable of type `ty` living at `address`
    pub fn add_variable(&mut self, name: &str, ty: TypeId, address: u64) -> Result<(), TargetError> {
        self.push_variable(name, ty, address, true)
    }

    /// Declare a variable whose frame is no longer live
    pub fn add_out_of_scope_variable(&mut self, name: &str, ty: TypeId, address: u64) -> Result<(), TargetError> {
        self.push_variable(name, ty, address, false)
    }

    fn push_variable(&mut self, name: &str, ty: TypeId, address: u64, in_scope: bool) -> Result<(), TargetError> {
        if self.types.get(ty).is_none() {
            return Err(TargetError::UnknownType(ty));
        }
        if self.variables.iter().any(|v| v.name == name) {
            return Err(TargetError::DuplicateVariable(name.to_string()));
        }
        self.variables.push(Variable {
            name: name.to_string(),
            ty,
            address,
            in_scope,
        });
        Ok(())
    }

    /// Record that the object at `address` is really a `ty`
    pub fn set_dynamic_type(&mut self, address: u64, ty: TypeId) -> Result<(), TargetError> {
        if self.types.get(ty).is_none() {
            return Err(TargetError::UnknownType(ty));
        }
        self.dynamic_types.insert(address, ty);
        Ok(())
    }

    pub fn build(self) -> Rc<Target> {
        log::info!(
            "Target ready: {} regions, {} variables",
            self.memory.regions().len(),
            self.variables.len()
        );
        Rc::new(Target {
            memory: Rc::new(self.memory),
            types: self.types,
            variables: self.variables,
            dynamic_types: self.dynamic_types,
            registry: RefCell::new(FormatterRegistry::default()),
        })
    }
}
