//! Demo session - a small debuggee exercising every printer path
//!
//! Variables:
//! - `list`: circular singly linked list (1 -> 2 -> 3 -> 1)
//! - `primes`, `origin`, `origin_ref`, `color`: plain data
//! - `numbers`, `bad_vec`: vectors (the second one breaks `len <= cap`)
//! - `greeting`: C string
//! - `maybe`, `nothing`: optionals
//! - `shape`: base pointer to a more derived object
//! - `widget`, `no_widget`: object references, one of them nil
//! - `dangling`, `opaque`, `stale`: unreadable, untyped and out-of-scope values

use std::rc::Rc;

use super::{Field, ScalarEncoding, Target, TargetBuilder, TargetError};
use crate::value::{
    CStringSummary, ChildCountSummary, ContiguousSynthetic, FnValidator, ValidationResult, ValueError, ValueObject,
};

pub const STACK_BASE: u64 = 0x7fff_0000;
pub const HEAP_BASE: u64 = 0x1000_0000;
pub const RODATA_BASE: u64 = 0x4000_0000;
pub const DANGLING_ADDRESS: u64 = 0xdead_0000;

const REGION_SIZE: usize = 0x1000;

/// Read a named integer member, looking through synthetic children
fn member_u64(valobj: &dyn ValueObject, name: &str) -> Option<u64> {
    if let Some(raw) = valobj.non_synthetic_value() {
        return member_u64(raw.as_ref(), name);
    }
    (0..valobj.num_children())
        .filter_map(|i| valobj.child_at_index(i).ok())
        .find(|child| child.name() == name)
        .and_then(|child| child.value_as_string(crate::value::Format::Decimal).ok().flatten())
        .and_then(|text| text.parse().ok())
}

fn check_vec(valobj: &dyn ValueObject) -> ValidationResult {
    match (member_u64(valobj, "len"), member_u64(valobj, "cap")) {
        (Some(len), Some(cap)) if len > cap => {
            ValidationResult::Failure(format!("len {} exceeds capacity {}", len, cap))
        }
        (Some(_), Some(_)) => ValidationResult::Success,
        _ => ValidationResult::Failure("unreadable vector header".to_string()),
    }
}

fn describe_widget(valobj: &dyn ValueObject) -> Result<Option<String>, ValueError> {
    let address = valobj
        .pointer_value()
        .ok_or_else(|| ValueError::Description("not an object reference".to_string()))?;
    let id = member_u64(valobj, "id").ok_or_else(|| ValueError::Description("no id".to_string()))?;
    Ok(Some(format!("<Widget {:#x} id={}>", address, id)))
}

/// Build the demo debuggee with formatters installed
pub fn demo_target() -> Result<Rc<Target>, TargetError> {
    let mut b = TargetBuilder::new();
    b.map(STACK_BASE, REGION_SIZE, "[stack]")?;
    b.map(HEAP_BASE, REGION_SIZE, "[heap]")?;
    b.map(RODATA_BASE, REGION_SIZE, "[rodata]")?;

    let t = b.types_mut();
    let int = t.add_scalar("int", ScalarEncoding::Signed, 4);
    let ulong = t.add_scalar("unsigned long", ScalarEncoding::Unsigned, 8);
    let char_ty = t.add_scalar("char", ScalarEncoding::Char, 1);
    let double = t.add_scalar("double", ScalarEncoding::Float, 8);
    let int_ptr = t.pointer_to(int);
    let char_ptr = t.pointer_to(char_ty);

    let node = t.declare_struct("Node", 16);
    let node_ptr = t.pointer_to(node);
    t.define_fields(node, vec![Field::new("value", 0, int), Field::new("next", 8, node_ptr)]);

    let point = t.add_struct("Point", 8, vec![Field::new("x", 0, int), Field::new("y", 4, int)]);
    let point_ref = t.reference_to(point);
    let primes_ty = t.array_of(int, 6);
    let vec_int = t.add_struct(
        "Vec<int>",
        24,
        vec![
            Field::new("data", 0, int_ptr),
            Field::new("len", 8, ulong),
            Field::new("cap", 16, ulong),
        ],
    );
    let opt_int = t.optional_of(int);
    let color = t.add_enum("Color", 4, &[("Red", 0), ("Green", 1), ("Blue", 2)]);

    let shape = t.add_struct("Shape", 12, vec![Field::new("kind", 0, color), Field::new("origin", 4, point)]);
    let shape_ptr = t.pointer_to(shape);
    let circle = t.add_struct(
        "Circle",
        24,
        vec![
            Field::new("kind", 0, color),
            Field::new("origin", 4, point),
            Field::new("radius", 16, double),
        ],
    );

    let widget = t.add_struct("Widget", 16, vec![Field::new("id", 0, int), Field::new("name", 8, char_ptr)]);
    let widget_ref = t.object_ref(widget);
    let opaque = t.add_unresolved("Opaque");

    // heap: linked list, vector storage, derived shape, widget
    let (n1, n2, n3) = (HEAP_BASE, HEAP_BASE + 0x10, HEAP_BASE + 0x20);
    for (addr, value, next) in [(n1, 1, n2), (n2, 2, n3), (n3, 3, n1)] {
        b.write_i32(addr, value)?;
        b.write_u64(addr + 8, next)?;
    }
    let storage = HEAP_BASE + 0x40;
    for (i, value) in [10, 20, 30, 40, 50].into_iter().enumerate() {
        b.write_i32(storage + 4 * i as u64, value)?;
    }
    let circle_obj = HEAP_BASE + 0x80;
    b.write_i32(circle_obj, 2)?;
    b.write_i32(circle_obj + 4, 3)?;
    b.write_i32(circle_obj + 8, 4)?;
    b.write_f64(circle_obj + 16, 1.5)?;
    b.set_dynamic_type(circle_obj, circle)?;
    let widget_obj = HEAP_BASE + 0xa0;
    b.write_i32(widget_obj, 7)?;
    b.write_u64(widget_obj + 8, RODATA_BASE + 0x20)?;

    b.write_c_string(RODATA_BASE, "hello, world")?;
    b.write_c_string(RODATA_BASE + 0x20, "gear")?;

    // stack variables
    let s = STACK_BASE;
    b.write_u64(s, n1)?;
    b.add_variable("list", node_ptr, s)?;

    for (i, value) in [2, 3, 5, 7, 11, 13].into_iter().enumerate() {
        b.write_i32(s + 0x10 + 4 * i as u64, value)?;
    }
    b.add_variable("primes", primes_ty, s + 0x10)?;

    b.write_i32(s + 0x30, -1)?;
    b.write_i32(s + 0x34, 4)?;
    b.add_variable("origin", point, s + 0x30)?;

    for (offset, len, cap) in [(0x40, 3, 4), (0x60, 5, 3)] {
        b.write_u64(s + offset, storage)?;
        b.write_u64(s + offset + 8, len)?;
        b.write_u64(s + offset + 16, cap)?;
    }
    b.add_variable("numbers", vec_int, s + 0x40)?;
    b.add_variable("bad_vec", vec_int, s + 0x60)?;

    b.write_u64(s + 0x80, RODATA_BASE)?;
    b.add_variable("greeting", char_ptr, s + 0x80)?;

    b.write_u8(s + 0x88, 1)?;
    b.write_i32(s + 0x88 + super::OPTIONAL_PAYLOAD_OFFSET, 42)?;
    b.add_variable("maybe", opt_int, s + 0x88)?;
    b.add_variable("nothing", opt_int, s + 0x98)?;

    b.write_i32(s + 0xa8, 1)?;
    b.add_variable("color", color, s + 0xa8)?;

    b.write_u64(s + 0xb0, circle_obj)?;
    b.add_variable("shape", shape_ptr, s + 0xb0)?;

    b.write_u64(s + 0xb8, widget_obj)?;
    b.add_variable("widget", widget_ref, s + 0xb8)?;
    b.add_variable("no_widget", widget_ref, s + 0xc0)?;

    b.write_u64(s + 0xc8, DANGLING_ADDRESS)?;
    b.add_variable("dangling", int_ptr, s + 0xc8)?;
    b.add_variable("opaque", opaque, s + 0xd0)?;
    b.add_out_of_scope_variable("stale", int, s + 0xd8)?;

    b.write_u64(s + 0xe0, s + 0x30)?;
    b.add_variable("origin_ref", point_ref, s + 0xe0)?;

    let target = b.build();
    target.add_summary("char *", Rc::new(CStringSummary::new(Rc::clone(target.memory()))));
    target.add_summary("Vec<int>", Rc::new(ChildCountSummary));
    target.add_synthetic("Vec<int>", Rc::new(ContiguousSynthetic::new("data", "len")));
    target.add_validator("Vec<int>", Rc::new(FnValidator::new(check_vec)));
    target.add_description("Widget", Rc::new(describe_widget));
    Ok(target)
}
