//! Type table - Static type descriptions for the simulated target

use crate::value::TypeFlags;

/// Index into a `TypeTable`
pub type TypeId = usize;

/// Size of a pointer in the target, in bytes
pub const POINTER_SIZE: usize = 8;

/// Offset of an optional's payload from its tag byte
pub const OPTIONAL_PAYLOAD_OFFSET: u64 = 8;

/// How a scalar's bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarEncoding {
    Signed,
    Unsigned,
    Float,
    Bool,
    Char,
}

/// Member of a struct
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub offset: u64,
    pub ty: TypeId,
}

impl Field {
    pub fn new(name: impl Into<String>, offset: u64, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            offset,
            ty,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Scalar { encoding: ScalarEncoding, size: usize },
    Pointer { pointee: TypeId },
    Reference { referent: TypeId },
    Struct { fields: Vec<Field>, size: usize },
    Array { element: TypeId, count: usize },
    Enum { size: usize, variants: Vec<(String, i64)> },
    /// Tag byte at offset 0, payload at `OPTIONAL_PAYLOAD_OFFSET`
    Optional { payload: TypeId },
    /// Reference to a heap object of class `class` (nil when 0)
    ObjectRef { class: TypeId },
    /// Type whose debug information is missing
    Unresolved,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
}

/// All types known to a target
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: Vec<TypeDecl>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, name: impl Into<String>, kind: TypeKind) -> TypeId {
        self.types.push(TypeDecl {
            name: name.into(),
            kind,
        });
        self.types.len() - 1
    }

    pub fn get(&self, ty: TypeId) -> Option<&TypeDecl> {
        self.types.get(ty)
    }

    /// Look a type up by name
    pub fn find(&self, name: &str) -> Option<TypeId> {
        self.types.iter().position(|t| t.name == name)
    }

    pub fn add_scalar(&mut self, name: &str, encoding: ScalarEncoding, size: usize) -> TypeId {
        self.add(name, TypeKind::Scalar { encoding, size })
    }

    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        let name = format!("{} *", self.name(pointee));
        self.add(name, TypeKind::Pointer { pointee })
    }

    pub fn reference_to(&mut self, referent: TypeId) -> TypeId {
        let name = format!("{} &", self.name(referent));
        self.add(name, TypeKind::Reference { referent })
    }

    /// Declare a struct before its fields are known (for self-referential types)
    pub fn declare_struct(&mut self, name: &str, size: usize) -> TypeId {
        self.add(
            name,
            TypeKind::Struct {
                fields: Vec::new(),
                size,
            },
        )
    }

    /// Complete a struct created with `declare_struct`
    pub fn define_fields(&mut self, ty: TypeId, new_fields: Vec<Field>) {
        if let Some(TypeDecl {
            kind: TypeKind::Struct { fields, .. },
            ..
        }) = self.types.get_mut(ty)
        {
            *fields = new_fields;
        }
    }

    pub fn add_struct(&mut self, name: &str, size: usize, fields: Vec<Field>) -> TypeId {
        self.add(name, TypeKind::Struct { fields, size })
    }

    pub fn array_of(&mut self, element: TypeId, count: usize) -> TypeId {
        let name = format!("{}[{}]", self.name(element), count);
        self.add(name, TypeKind::Array { element, count })
    }

    pub fn add_enum(&mut self, name: &str, size: usize, variants: &[(&str, i64)]) -> TypeId {
        let variants = variants
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        self.add(name, TypeKind::Enum { size, variants })
    }

    pub fn optional_of(&mut self, payload: TypeId) -> TypeId {
        let name = format!("Optional<{}>", self.name(payload));
        self.add(name, TypeKind::Optional { payload })
    }

    pub fn object_ref(&mut self, class: TypeId) -> TypeId {
        let name = format!("{} *", self.name(class));
        self.add(name, TypeKind::ObjectRef { class })
    }

    pub fn add_unresolved(&mut self, name: &str) -> TypeId {
        self.add(name, TypeKind::Unresolved)
    }

    /// Name of a type, `<unknown>` for an invalid id
    pub fn name(&self, ty: TypeId) -> &str {
        self.get(ty).map(|t| t.name.as_str()).unwrap_or("<unknown>")
    }

    /// Size of a value of this type in bytes
    pub fn size_of(&self, ty: TypeId) -> usize {
        match self.get(ty).map(|t| &t.kind) {
            Some(TypeKind::Scalar { size, .. }) | Some(TypeKind::Enum { size, .. }) => *size,
            Some(TypeKind::Pointer { .. })
            | Some(TypeKind::Reference { .. })
            | Some(TypeKind::ObjectRef { .. }) => POINTER_SIZE,
            Some(TypeKind::Struct { size, .. }) => *size,
            Some(TypeKind::Array { element, count }) => self.size_of(*element) * count,
            Some(TypeKind::Optional { payload }) => {
                OPTIONAL_PAYLOAD_OFFSET as usize + self.size_of(*payload)
            }
            Some(TypeKind::Unresolved) | None => 0,
        }
    }

    /// Classification flags for a type
    pub fn flags(&self, ty: TypeId) -> TypeFlags {
        match self.get(ty).map(|t| &t.kind) {
            Some(TypeKind::Scalar { .. }) => {
                TypeFlags::HAS_VALUE | TypeFlags::IS_SCALAR | TypeFlags::IS_BUILTIN
            }
            Some(TypeKind::Pointer { .. }) => {
                TypeFlags::HAS_VALUE | TypeFlags::HAS_CHILDREN | TypeFlags::IS_POINTER
            }
            Some(TypeKind::Reference { .. }) => {
                TypeFlags::HAS_VALUE | TypeFlags::HAS_CHILDREN | TypeFlags::IS_REFERENCE
            }
            Some(TypeKind::Struct { .. }) | Some(TypeKind::Optional { .. }) => {
                TypeFlags::HAS_CHILDREN | TypeFlags::IS_AGGREGATE
            }
            Some(TypeKind::Array { .. }) => TypeFlags::HAS_CHILDREN | TypeFlags::IS_ARRAY,
            Some(TypeKind::Enum { .. }) => {
                TypeFlags::HAS_VALUE | TypeFlags::IS_SCALAR | TypeFlags::IS_ENUM
            }
            Some(TypeKind::ObjectRef { .. }) => {
                TypeFlags::HAS_VALUE
                    | TypeFlags::HAS_CHILDREN
                    | TypeFlags::IS_POINTER
                    | TypeFlags::INSTANCE_IS_POINTER
            }
            Some(TypeKind::Unresolved) | None => TypeFlags::empty(),
        }
    }
}
