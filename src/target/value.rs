//! Target values - `ValueObject` over the simulated debuggee's memory

use std::fmt;
use std::rc::Rc;

use super::types::{ScalarEncoding, TypeId, TypeKind, OPTIONAL_PAYLOAD_OFFSET};
use super::{Target, Variable};
use crate::core::MemoryError;
use crate::value::{
    Format, SummaryFormatter, SyntheticValue, TypeFlags, Validator, ValueError, ValueObject, ValueObjectSP,
};

/// A typed location in target memory
#[derive(Clone)]
pub struct TargetValue {
    target: Rc<Target>,
    name: String,
    path: String,
    ty: TypeId,
    address: u64,
    in_scope: bool,
    /// Runtime class of the pointee when it is more derived than the static one
    dynamic_pointee: Option<TypeId>,
}

impl TargetValue {
    pub(super) fn root(target: Rc<Target>, var: &Variable) -> Self {
        Self {
            target,
            name: var.name.clone(),
            path: var.name.clone(),
            ty: var.ty,
            address: var.address,
            in_scope: var.in_scope,
            dynamic_pointee: None,
        }
    }

    /// Address the value lives at
    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn type_id(&self) -> TypeId {
        self.ty
    }

    fn child(&self, name: String, path: String, ty: TypeId, address: u64) -> ValueObjectSP {
        Rc::new(Self {
            target: Rc::clone(&self.target),
            name,
            path,
            ty,
            address,
            in_scope: self.in_scope,
            dynamic_pointee: None,
        })
    }

    fn kind(&self) -> Option<&TypeKind> {
        self.target.types().get(self.ty).map(|t| &t.kind)
    }

    fn read_pointer(&self) -> Result<u64, ValueError> {
        Ok(self.target.memory().read_u64(self.address)?)
    }

    /// Type of whatever a pointer, reference or object reference refers to
    fn pointee(&self) -> Option<TypeId> {
        match self.kind()? {
            TypeKind::Pointer { pointee } => Some(self.dynamic_pointee.unwrap_or(*pointee)),
            TypeKind::ObjectRef { class } => Some(self.dynamic_pointee.unwrap_or(*class)),
            TypeKind::Reference { referent } => Some(*referent),
            _ => None,
        }
    }

    fn pointee_kind(&self) -> Option<&TypeKind> {
        self.pointee()
            .and_then(|ty| self.target.types().get(ty))
            .map(|t| &t.kind)
    }

    /// Static type name, ignoring any dynamic override
    fn static_type_name(&self) -> Option<String> {
        match self.kind()? {
            TypeKind::Unresolved => None,
            _ => Some(self.target.types().name(self.ty).to_string()),
        }
    }

    fn element(&self, element: TypeId, base: u64, index: usize) -> Result<ValueObjectSP, ValueError> {
        let size = self.target.types().size_of(element) as u64;
        let address = (index as u64)
            .checked_mul(size)
            .and_then(|offset| offset_address(base, offset).ok())
            .ok_or(MemoryError::Unmapped { address: base })?;
        Ok(self.child(
            format!("[{}]", index),
            format!("{}[{}]", self.path, index),
            element,
            address,
        ))
    }

    fn pointee_child(&self, index: usize) -> Result<ValueObjectSP, ValueError> {
        let pointee = self.pointee().ok_or(ValueError::InvalidType)?;
        let address = self.read_pointer()?;
        match self.pointee_kind() {
            Some(TypeKind::Struct { fields, .. }) => {
                let field = fields.get(index).ok_or(ValueError::ChildIndex { index })?;
                Ok(self.child(
                    field.name.clone(),
                    format!("{}->{}", self.path, field.name),
                    field.ty,
                    offset_address(address, field.offset)?,
                ))
            }
            Some(TypeKind::Array { element, count }) if index < *count => self.element(*element, address, index),
            Some(TypeKind::Unresolved) | Some(TypeKind::Array { .. }) | None => Err(ValueError::ChildIndex { index }),
            Some(_) if index == 0 => Ok(self.child(
                format!("*{}", self.name),
                format!("*{}", self.path),
                pointee,
                address,
            )),
            Some(_) => Err(ValueError::ChildIndex { index }),
        }
    }

    fn lookup<T>(&self, find: impl Fn(&str) -> Option<T>) -> Option<T> {
        self.type_name()
            .and_then(|name| find(&name))
            .or_else(|| self.static_type_name().and_then(|name| find(&name)))
    }

    fn scalar_string(&self, encoding: ScalarEncoding, size: usize, format: Format) -> Result<String, ValueError> {
        let bytes = self.target.memory().read(self.address, size)?;
        Ok(format_scalar(encoding, &bytes, format))
    }
}

impl ValueObject for TargetValue {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn type_name(&self) -> Option<String> {
        match (self.kind()?, self.dynamic_pointee) {
            (TypeKind::Unresolved, _) => None,
            (_, Some(dynamic)) => Some(format!("{} *", self.target.types().name(dynamic))),
            _ => Some(self.target.types().name(self.ty).to_string()),
        }
    }

    fn type_flags(&self) -> TypeFlags {
        self.target.types().flags(self.ty)
    }

    fn location(&self) -> String {
        format!("0x{:016x}", self.address)
    }

    fn expression_path(&self) -> String {
        self.path.clone()
    }

    fn is_in_scope(&self) -> bool {
        self.in_scope
    }

    fn is_dynamic(&self) -> bool {
        self.dynamic_pointee.is_some()
    }

    fn dynamic_value(&self) -> Option<ValueObjectSP> {
        if self.dynamic_pointee.is_some() {
            return None;
        }
        let static_pointee = match self.kind()? {
            TypeKind::Pointer { pointee } => *pointee,
            TypeKind::ObjectRef { class } => *class,
            _ => return None,
        };
        let address = self.read_pointer().ok()?;
        let dynamic = self.target.dynamic_type_at(address)?;
        if dynamic == static_pointee {
            return None;
        }
        log::trace!(
            "'{}' points at a {} at {:#x}",
            self.path,
            self.target.types().name(dynamic),
            address
        );
        Some(Rc::new(Self {
            dynamic_pointee: Some(dynamic),
            ..self.clone()
        }))
    }

    fn static_value(&self) -> Option<ValueObjectSP> {
        self.dynamic_pointee.map(|_| {
            Rc::new(Self {
                dynamic_pointee: None,
                ..self.clone()
            }) as ValueObjectSP
        })
    }

    fn synthetic_value(&self) -> Option<ValueObjectSP> {
        let provider = self.lookup(|name| self.target.synthetic_for(name))?;
        Some(Rc::new(SyntheticValue::new(Rc::new(self.clone()), provider)))
    }

    fn num_children(&self) -> usize {
        match self.kind() {
            Some(TypeKind::Struct { fields, .. }) => fields.len(),
            Some(TypeKind::Array { count, .. }) => *count,
            Some(TypeKind::Optional { .. }) => 1,
            Some(TypeKind::Pointer { .. }) | Some(TypeKind::Reference { .. }) | Some(TypeKind::ObjectRef { .. }) => {
                match self.pointee_kind() {
                    Some(TypeKind::Struct { fields, .. }) => fields.len(),
                    Some(TypeKind::Array { count, .. }) => *count,
                    Some(TypeKind::Unresolved) | None => 0,
                    Some(_) => 1,
                }
            }
            _ => 0,
        }
    }

    fn child_at_index(&self, index: usize) -> Result<ValueObjectSP, ValueError> {
        match self.kind().ok_or(ValueError::InvalidType)? {
            TypeKind::Struct { fields, .. } => {
                let field = fields.get(index).ok_or(ValueError::ChildIndex { index })?;
                Ok(self.child(
                    field.name.clone(),
                    format!("{}.{}", self.path, field.name),
                    field.ty,
                    offset_address(self.address, field.offset)?,
                ))
            }
            TypeKind::Array { element, count } if index < *count => self.element(*element, self.address, index),
            TypeKind::Optional { payload } if index == 0 => Ok(self.child(
                "value".to_string(),
                format!("{}.value", self.path),
                *payload,
                offset_address(self.address, OPTIONAL_PAYLOAD_OFFSET)?,
            )),
            TypeKind::Pointer { .. } | TypeKind::Reference { .. } | TypeKind::ObjectRef { .. } => {
                self.pointee_child(index)
            }
            _ => Err(ValueError::ChildIndex { index }),
        }
    }

    fn synthetic_array_member(&self, index: usize) -> Result<ValueObjectSP, ValueError> {
        match self.kind().ok_or(ValueError::InvalidType)? {
            TypeKind::Pointer { pointee } => {
                let base = self.read_pointer()?;
                self.element(*pointee, base, index)
            }
            TypeKind::Array { element, .. } => self.element(*element, self.address, index),
            _ => Err(ValueError::ChildIndex { index }),
        }
    }

    fn value_as_string(&self, format: Format) -> Result<Option<String>, ValueError> {
        match self.kind().ok_or(ValueError::InvalidType)? {
            TypeKind::Scalar { encoding, size } => self.scalar_string(*encoding, *size, format).map(Some),
            TypeKind::Enum { size, variants } => {
                if format != Format::Default {
                    return self.scalar_string(ScalarEncoding::Signed, *size, format).map(Some);
                }
                let raw = self.target.memory().read_unsigned(self.address, *size)?;
                let value = sign_extend(raw, *size);
                let text = variants
                    .iter()
                    .find(|(_, v)| *v == value)
                    .map(|(name, _)| name.clone())
                    .unwrap_or_else(|| value.to_string());
                Ok(Some(text))
            }
            TypeKind::Pointer { .. } | TypeKind::Reference { .. } | TypeKind::ObjectRef { .. } => {
                let address = self.read_pointer()?;
                let text = match format {
                    Format::Default | Format::Hex => format!("0x{:016x}", address),
                    other => format_scalar(ScalarEncoding::Unsigned, &address.to_le_bytes(), other),
                };
                Ok(Some(text))
            }
            TypeKind::Struct { .. } | TypeKind::Array { .. } | TypeKind::Optional { .. } => Ok(None),
            TypeKind::Unresolved => Err(ValueError::InvalidType),
        }
    }

    fn default_format(&self) -> Format {
        match self.kind() {
            Some(TypeKind::Scalar {
                encoding: ScalarEncoding::Char,
                ..
            }) => Format::Char,
            _ => Format::Default,
        }
    }

    fn pointer_value(&self) -> Option<u64> {
        match self.kind()? {
            TypeKind::Pointer { .. } | TypeKind::Reference { .. } | TypeKind::ObjectRef { .. } => {
                self.read_pointer().ok()
            }
            _ => None,
        }
    }

    fn is_nil(&self) -> bool {
        matches!(self.kind(), Some(TypeKind::ObjectRef { .. })) && self.pointer_value() == Some(0)
    }

    fn is_uninitialized(&self) -> bool {
        matches!(self.kind(), Some(TypeKind::Optional { .. }))
            && self.target.memory().read_u8(self.address) == Ok(0)
    }

    fn summary_formatter(&self) -> Option<Rc<dyn SummaryFormatter>> {
        self.lookup(|name| self.target.summary_for(name))
    }

    fn validator(&self) -> Option<Rc<dyn Validator>> {
        self.lookup(|name| self.target.validator_for(name))
    }

    fn object_description(&self) -> Result<Option<String>, ValueError> {
        let class_name = self.pointee().map(|ty| self.target.types().name(ty).to_string());
        let description = class_name
            .and_then(|name| self.target.description_for(&name))
            .or_else(|| self.lookup(|name| self.target.description_for(name)));
        match description {
            Some(describe) => (*describe)(self),
            None => Ok(None),
        }
    }

    fn supports_object_description(&self) -> bool {
        let class_name = self.pointee().map(|ty| self.target.types().name(ty).to_string());
        class_name
            .and_then(|name| self.target.description_for(&name))
            .or_else(|| self.lookup(|name| self.target.description_for(name)))
            .is_some()
    }
}

impl fmt::Debug for TargetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetValue")
            .field("path", &self.path)
            .field("type", &self.type_name())
            .field("address", &format_args!("{:#x}", self.address))
            .finish_non_exhaustive()
    }
}

/// `base + offset`, or an unreadable address when that wraps past the end of memory
fn offset_address(base: u64, offset: u64) -> Result<u64, ValueError> {
    base.checked_add(offset)
        .ok_or(ValueError::Memory(MemoryError::Unmapped { address: base }))
}

fn sign_extend(raw: u64, size: usize) -> i64 {
    if size == 0 {
        return 0;
    }
    let shift = 64u32.saturating_sub((size as u32) * 8);
    ((raw << shift) as i64) >> shift
}

fn char_literal(byte: u8) -> String {
    match byte {
        0 => "'\\0'".to_string(),
        b'\n' => "'\\n'".to_string(),
        b'\t' => "'\\t'".to_string(),
        b'\'' => "'\\''".to_string(),
        0x20..=0x7e => format!("'{}'", byte as char),
        _ => format!("'\\x{:02x}'", byte),
    }
}

/// Render little-endian scalar bytes in `format`
fn format_scalar(encoding: ScalarEncoding, bytes: &[u8], format: Format) -> String {
    let size = bytes.len().min(8);
    let mut raw_bytes = [0u8; 8];
    raw_bytes[..size].copy_from_slice(&bytes[..size]);
    let raw = u64::from_le_bytes(raw_bytes);

    match format {
        Format::Hex => format!("0x{:0width$x}", raw, width = size * 2),
        Format::Binary => format!("0b{:0width$b}", raw, width = size * 8),
        Format::Char => char_literal(bytes.first().copied().unwrap_or(0)),
        Format::Boolean => (raw != 0).to_string(),
        Format::Bytes => bytes
            .iter()
            .map(|b| hex::encode([*b]))
            .collect::<Vec<_>>()
            .join(" "),
        Format::Decimal => match encoding {
            ScalarEncoding::Signed => sign_extend(raw, size).to_string(),
            _ => raw.to_string(),
        },
        Format::Default => match encoding {
            ScalarEncoding::Signed => sign_extend(raw, size).to_string(),
            ScalarEncoding::Unsigned => raw.to_string(),
            ScalarEncoding::Bool => (raw != 0).to_string(),
            ScalarEncoding::Char => char_literal(bytes.first().copied().unwrap_or(0)),
            ScalarEncoding::Float if size == 4 => f32::from_bits(raw as u32).to_string(),
            ScalarEncoding::Float => f64::from_bits(raw).to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0xff, 1), -1);
        assert_eq!(sign_extend(0x7f, 1), 127);
        assert_eq!(sign_extend(0xffff_fffe, 4), -2);
        assert_eq!(sign_extend(u64::MAX, 8), -1);
        assert_eq!(sign_extend(u64::MAX, 0), 0);
    }

    #[test]
    fn test_offset_address_wraps_to_error() {
        assert_eq!(offset_address(0x1000, 8), Ok(0x1008));
        assert_eq!(
            offset_address(u64::MAX - 1, 4),
            Err(ValueError::Memory(MemoryError::Unmapped { address: u64::MAX - 1 }))
        );
    }

    #[test]
    fn test_zero_sized_scalar() {
        assert_eq!(format_scalar(ScalarEncoding::Signed, &[], Format::Default), "0");
        assert_eq!(format_scalar(ScalarEncoding::Signed, &[], Format::Decimal), "0");
    }

    #[test]
    fn test_format_scalar() {
        let bytes = (-2i32).to_le_bytes();
        assert_eq!(format_scalar(ScalarEncoding::Signed, &bytes, Format::Default), "-2");
        assert_eq!(format_scalar(ScalarEncoding::Signed, &bytes, Format::Hex), "0xfffffffe");
        assert_eq!(format_scalar(ScalarEncoding::Unsigned, &bytes, Format::Default), "4294967294");
        assert_eq!(format_scalar(ScalarEncoding::Signed, &bytes, Format::Bytes), "fe ff ff ff");
        assert_eq!(format_scalar(ScalarEncoding::Unsigned, &[5], Format::Binary), "0b00000101");
        assert_eq!(format_scalar(ScalarEncoding::Bool, &[1], Format::Default), "true");
        assert_eq!(format_scalar(ScalarEncoding::Char, b"A", Format::Default), "'A'");
        assert_eq!(format_scalar(ScalarEncoding::Char, &[0], Format::Default), "'\\0'");
        assert_eq!(format_scalar(ScalarEncoding::Float, &1.5f64.to_le_bytes(), Format::Default), "1.5");
    }
}
