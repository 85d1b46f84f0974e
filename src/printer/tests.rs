//! Printer tests
//!
//! Run with: cargo test printer -- --nocapture

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::core::{MemoryError, Stream};
use crate::value::{
    ChildCountSummary, ChildFilter, FnSummary, FnValidator, Format, SummaryFormatter, SyntheticValue, TypeFlags,
    ValidationResult, Validator, ValueError, ValueObject, ValueObjectSP,
};

/// Hand-built value node
struct MockValue {
    name: String,
    path: Option<String>,
    type_name: Option<String>,
    flags: TypeFlags,
    value: Result<Option<String>, ValueError>,
    pointer: Option<u64>,
    nil: bool,
    children: RefCell<Vec<Result<ValueObjectSP, ValueError>>>,
    array_members: RefCell<Vec<ValueObjectSP>>,
    summary: Option<Rc<dyn SummaryFormatter>>,
    validator: Option<Rc<dyn Validator>>,
    description: Option<Result<Option<String>, ValueError>>,
    dynamic: RefCell<Option<ValueObjectSP>>,
    synthetic: RefCell<Option<ValueObjectSP>>,
    flag_calls: Cell<usize>,
    nil_calls: Cell<usize>,
}

impl MockValue {
    fn new(name: &str, type_name: &str, flags: TypeFlags) -> Self {
        Self {
            name: name.to_string(),
            path: None,
            type_name: Some(type_name.to_string()),
            flags,
            value: Ok(None),
            pointer: None,
            nil: false,
            children: RefCell::new(Vec::new()),
            array_members: RefCell::new(Vec::new()),
            summary: None,
            validator: None,
            description: None,
            dynamic: RefCell::new(None),
            synthetic: RefCell::new(None),
            flag_calls: Cell::new(0),
            nil_calls: Cell::new(0),
        }
    }

    fn scalar(name: &str, value: &str) -> Self {
        Self::new(name, "int", TypeFlags::HAS_VALUE | TypeFlags::IS_SCALAR | TypeFlags::IS_BUILTIN)
            .with_value(value)
    }

    fn aggregate(name: &str, type_name: &str) -> Self {
        Self::new(name, type_name, TypeFlags::HAS_CHILDREN | TypeFlags::IS_AGGREGATE)
    }

    fn pointer(name: &str, type_name: &str, address: u64) -> Self {
        Self::new(
            name,
            type_name,
            TypeFlags::HAS_VALUE | TypeFlags::HAS_CHILDREN | TypeFlags::IS_POINTER,
        )
        .with_value(&format!("0x{:016x}", address))
        .with_pointer(address)
    }

    fn with_value(mut self, value: &str) -> Self {
        self.value = Ok(Some(value.to_string()));
        self
    }

    fn with_value_error(mut self, error: ValueError) -> Self {
        self.value = Err(error);
        self
    }

    fn with_pointer(mut self, address: u64) -> Self {
        self.pointer = Some(address);
        self
    }

    fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    fn with_summary(mut self, summary: impl SummaryFormatter + 'static) -> Self {
        self.summary = Some(Rc::new(summary));
        self
    }

    fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Rc::new(validator));
        self
    }

    fn with_description(mut self, description: Result<Option<String>, ValueError>) -> Self {
        self.description = Some(description);
        self
    }

    fn unresolved(mut self) -> Self {
        self.type_name = None;
        self.flags = TypeFlags::empty();
        self
    }

    fn nil(mut self) -> Self {
        self.nil = true;
        self
    }

    fn rc(self) -> Rc<MockValue> {
        Rc::new(self)
    }

    fn push(&self, child: &Rc<MockValue>) {
        self.children.borrow_mut().push(Ok(sp(child)));
    }

    fn push_error(&self, error: ValueError) {
        self.children.borrow_mut().push(Err(error));
    }
}

impl ValueObject for MockValue {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn type_name(&self) -> Option<String> {
        self.type_name.clone()
    }

    fn type_flags(&self) -> TypeFlags {
        self.flag_calls.set(self.flag_calls.get() + 1);
        self.flags
    }

    fn location(&self) -> String {
        format!("0x{:016x}", self.pointer.unwrap_or(0))
    }

    fn expression_path(&self) -> String {
        self.path.clone().unwrap_or_else(|| self.name.clone())
    }

    fn is_dynamic(&self) -> bool {
        self.type_name.as_deref().is_some_and(|t| t.starts_with("Derived"))
    }

    fn dynamic_value(&self) -> Option<ValueObjectSP> {
        self.dynamic.borrow().clone()
    }

    fn synthetic_value(&self) -> Option<ValueObjectSP> {
        self.synthetic.borrow().clone()
    }

    fn num_children(&self) -> usize {
        self.children.borrow().len()
    }

    fn child_at_index(&self, index: usize) -> Result<ValueObjectSP, ValueError> {
        self.children
            .borrow()
            .get(index)
            .cloned()
            .unwrap_or(Err(ValueError::ChildIndex { index }))
    }

    fn synthetic_array_member(&self, index: usize) -> Result<ValueObjectSP, ValueError> {
        self.array_members
            .borrow()
            .get(index)
            .cloned()
            .ok_or(ValueError::ChildIndex { index })
    }

    fn value_as_string(&self, format: Format) -> Result<Option<String>, ValueError> {
        let value = self.value.clone()?;
        match (format, value) {
            (Format::Hex, Some(v)) => Ok(v.parse::<i64>().map(|n| format!("{:#x}", n)).ok().or(Some(v))),
            (_, v) => Ok(v),
        }
    }

    fn pointer_value(&self) -> Option<u64> {
        self.pointer
    }

    fn is_nil(&self) -> bool {
        self.nil_calls.set(self.nil_calls.get() + 1);
        self.nil
    }

    fn summary_formatter(&self) -> Option<Rc<dyn SummaryFormatter>> {
        self.summary.clone()
    }

    fn validator(&self) -> Option<Rc<dyn Validator>> {
        self.validator.clone()
    }

    fn object_description(&self) -> Result<Option<String>, ValueError> {
        self.description.clone().unwrap_or(Ok(None))
    }

    fn supports_object_description(&self) -> bool {
        self.description.is_some()
    }
}

fn sp(value: &Rc<MockValue>) -> ValueObjectSP {
    Rc::clone(value) as ValueObjectSP
}

fn render(valobj: &Rc<MockValue>, options: &DumpOptions) -> (bool, String) {
    let mut stream = Stream::new();
    let printed = print_value_object(&sp(valobj), &mut stream, options);
    (printed, stream.into_string())
}

fn block_options() -> DumpOptions {
    DumpOptions::new().with_oneliner(false)
}

/// `Node *` at 0x1000 whose `self` member points back at itself
fn self_cycle() -> Rc<MockValue> {
    let head = MockValue::pointer("head", "Node *", 0x1000).rc();
    let x = MockValue::scalar("x", "1").rc();
    let this = MockValue::pointer("self", "Node *", 0x1000).rc();
    this.push(&x);
    this.push(&this);
    head.push(&x);
    head.push(&this);
    head
}

#[test]
fn test_self_cycle_terminates() {
    let options = DumpOptions::new()
        .with_max_depth(5)
        .with_ptr_depth(PointerDepth::new(PointerDepthMode::Always, 5));
    let (printed, text) = render(&self_cycle(), &options);

    assert!(printed);
    assert_eq!(
        text,
        "(Node *) head = 0x0000000000001000 {\n  x = 1\n  self = 0x0000000000001000 <already shown>\n}\n"
    );
    assert_eq!(text.matches(ALREADY_SHOWN).count(), 1);
}

#[test]
fn test_two_node_cycle_terminates() {
    let a = MockValue::pointer("a", "Node *", 0x1000).rc();
    let a_again = MockValue::pointer("next", "Node *", 0x1000).rc();
    let b = MockValue::pointer("next", "Node *", 0x2000).rc();
    let one = MockValue::scalar("val", "1").rc();
    let two = MockValue::scalar("val", "2").rc();

    a.push(&one);
    a.push(&b);
    b.push(&two);
    b.push(&a_again);
    a_again.push(&one);
    a_again.push(&b);

    let options = block_options().with_ptr_depth(PointerDepth::new(PointerDepthMode::Always, 10));
    let (_, text) = render(&a, &options);

    assert_eq!(
        text,
        "(Node *) a = 0x0000000000001000 {\n  val = 1\n  next = 0x0000000000002000 {\n    val = 2\n    next = 0x0000000000001000 <already shown>\n  }\n}\n"
    );
    assert_eq!(text.matches(ALREADY_SHOWN).count(), 1);
}

#[test]
fn test_cycle_set_is_fresh_per_print() {
    let head = self_cycle();
    let options = DumpOptions::new()
        .with_max_depth(5)
        .with_ptr_depth(PointerDepth::new(PointerDepthMode::Always, 5));
    let (_, first) = render(&head, &options);
    let (_, second) = render(&head, &options);
    assert_eq!(first, second);
}

#[test]
fn test_depth_limit_elides_children() {
    let root = MockValue::aggregate("s", "Outer").rc();
    let inner = MockValue::aggregate("a", "Inner").rc();
    let leaf = MockValue::scalar("c", "1").rc();
    inner.push(&leaf);
    root.push(&inner);

    let (_, text) = render(&root, &block_options().with_max_depth(1));
    assert_eq!(text, "(Outer) s = {\n  a = {...}\n}\n");

    let (_, text) = render(&root, &block_options().with_max_depth(0));
    assert_eq!(text, "(Outer) s = {...}\n");
}

#[test]
fn test_pointer_depth_limits_expansion() {
    let target = MockValue::scalar("*p", "5").rc();
    let p = MockValue::pointer("p", "int *", 0x1000).rc();
    p.push(&target);

    let (_, text) = render(&p, &DumpOptions::new());
    assert_eq!(text, "(int *) p = 0x0000000000001000\n");

    let never = DumpOptions::new().with_ptr_depth(PointerDepth::new(PointerDepthMode::Never, 3));
    let (_, text) = render(&p, &never);
    assert_eq!(text, "(int *) p = 0x0000000000001000\n");

    let once = block_options().with_ptr_depth(PointerDepth::new(PointerDepthMode::Always, 1));
    let (_, text) = render(&p, &once);
    assert_eq!(text, "(int *) p = 0x0000000000001000 {\n  *p = 5\n}\n");
}

#[test]
fn test_null_pointer_has_no_children() {
    let p = MockValue::pointer("p", "int *", 0).rc();
    p.push(&MockValue::scalar("*p", "0").rc());

    let options = DumpOptions::new().with_ptr_depth(PointerDepth::new(PointerDepthMode::Always, 4));
    let (_, text) = render(&p, &options);
    assert_eq!(text, "(int *) p = 0x0000000000000000\n");
}

#[test]
fn test_anonymous_element_pointers_expand_in_default_mode() {
    let vec = MockValue::aggregate("v", "Vec").rc();
    let element = MockValue::pointer("[0]", "Item *", 0x4000).rc();
    element.push(&MockValue::scalar("id", "7").rc());
    vec.push(&element);

    let (_, text) = render(&vec, &block_options());
    assert_eq!(text, "(Vec) v = {\n  [0] = 0x0000000000004000 {\n    id = 7\n  }\n}\n");
}

#[test]
fn test_classification_is_computed_once() {
    let x = MockValue::scalar("x", "42").rc();
    let (_, text) = render(&x, &DumpOptions::new());
    assert_eq!(text, "(int) x = 42\n");
    assert_eq!(x.flag_calls.get(), 1);
    assert_eq!(x.nil_calls.get(), 1);

    let s = MockValue::aggregate("s", "S").rc();
    s.push(&MockValue::scalar("a", "1").rc());
    let (_, _) = render(&s, &block_options());
    assert_eq!(s.flag_calls.get(), 1);
    assert_eq!(s.nil_calls.get(), 1);
}

#[test]
fn test_children_are_capped() {
    let arr = MockValue::new("arr", "int[5]", TypeFlags::HAS_CHILDREN | TypeFlags::IS_ARRAY).rc();
    for i in 0..5 {
        arr.push(&MockValue::scalar(&format!("[{}]", i), &i.to_string()).rc());
    }

    let (_, text) = render(&arr, &block_options().with_max_children(2));
    assert_eq!(text, "(int[5]) arr = {\n  [0] = 0\n  [1] = 1\n  ...\n}\n");
    assert_eq!(text.lines().filter(|l| l.trim() == CHILDREN_TRUNCATED).count(), 1);

    let (_, text) = render(&arr, &block_options().with_max_children(2).with_ignore_cap(true));
    assert!(text.contains("[4] = 4"));
    assert!(!text.contains(CHILDREN_TRUNCATED));

    let (_, text) = render(&arr, &DumpOptions::new().with_max_children(2));
    assert_eq!(text, "(int[5]) arr = ([0] = 0, [1] = 1, ...)\n");

    let (_, text) = render(&arr, &DumpOptions::new().with_max_children(2).with_ignore_cap(true));
    assert_eq!(text, "(int[5]) arr = ([0] = 0, [1] = 1, [2] = 2, [3] = 3, [4] = 4)\n");
}

#[test]
fn test_empty_aggregates() {
    let plain = MockValue::aggregate("e", "Empty").rc();
    let (_, text) = render(&plain, &DumpOptions::new());
    assert_eq!(text, "(Empty) e = {}\n");

    let summarized = MockValue::aggregate("e", "Empty")
        .with_summary(FnSummary::new(|_| Ok("empty".to_string())))
        .rc();
    let (_, text) = render(&summarized, &DumpOptions::new());
    assert_eq!(text, "(Empty) e = empty\n");

    let counted = MockValue::aggregate("v", "Vec").with_summary(ChildCountSummary).rc();
    let (_, text) = render(&counted, &DumpOptions::new());
    assert_eq!(text, "(Vec) v = size=0\n");

    let (_, text) = render(&counted, &DumpOptions::new().with_reveal_empty_aggregates(true));
    assert_eq!(text, "(Vec) v = size=0 {}\n");
}

#[test]
fn test_failed_validation_is_not_fatal() {
    let v = MockValue::aggregate("v", "Vec")
        .with_validator(FnValidator::new(|_| ValidationResult::Failure("len > cap".to_string())))
        .rc();
    v.push(&MockValue::scalar("len", "3").rc());

    let (printed, text) = render(&v, &block_options().with_validation(true));
    assert!(printed);
    assert_eq!(text, "! (Vec) v = {\n  len = 3\n}\n! validation error: len > cap\n");

    let (_, text) = render(&v, &block_options());
    assert_eq!(text, "(Vec) v = {\n  len = 3\n}\n");
}

#[test]
fn test_passing_validation_marker() {
    let x = MockValue::scalar("x", "1")
        .with_validator(FnValidator::new(|_| ValidationResult::Success))
        .rc();

    let (_, text) = render(&x, &DumpOptions::new().with_validation(true));
    assert_eq!(text, "(int) x = 1\n");

    let options = DumpOptions::new().with_validation(true).with_validation_pass_marker("  ");
    let (_, text) = render(&x, &options);
    assert_eq!(text, "  (int) x = 1\n");
}

#[test]
fn test_child_error_is_rendered_inline() {
    let s = MockValue::aggregate("s", "S").rc();
    s.push(&MockValue::scalar("a", "1").rc());
    s.push_error(ValueError::Memory(MemoryError::Unmapped { address: 0 }));
    s.push(&MockValue::scalar("c", "3").rc());

    let (printed, text) = render(&s, &block_options());
    assert!(printed);
    assert_eq!(
        text,
        "(S) s = {\n  a = 1\n  [1] = <could not read memory at 0x0>\n  c = 3\n}\n"
    );
}

#[test]
fn test_value_error_stops_children() {
    let p = MockValue::pointer("p", "int *", 0x10)
        .with_value_error(ValueError::Memory(MemoryError::Unmapped { address: 0x10 }))
        .rc();
    p.push(&MockValue::scalar("*p", "1").rc());

    let options = DumpOptions::new().with_ptr_depth(PointerDepth::new(PointerDepthMode::Always, 2));
    let (printed, text) = render(&p, &options);
    assert!(printed);
    assert_eq!(text, "(int *) p = <could not read memory at 0x10>\n");
}

#[test]
fn test_summary_error_keeps_children() {
    let s = MockValue::aggregate("s", "S")
        .with_summary(FnSummary::new(|_| Err(ValueError::Summary("boom".to_string()))))
        .rc();
    s.push(&MockValue::scalar("a", "1").rc());

    let (printed, text) = render(&s, &DumpOptions::new());
    assert!(printed);
    assert_eq!(text, "(S) s = <summary provider failed: boom> {\n  a = 1\n}\n");
}

#[test]
fn test_unresolved_type() {
    let x = MockValue::new("x", "", TypeFlags::empty())
        .unresolved()
        .with_value_error(ValueError::InvalidType)
        .rc();

    let (printed, text) = render(&x, &DumpOptions::new());
    assert!(!printed);
    assert_eq!(text, "x = <could not resolve type>\n");

    let (_, text) = render(&x, &DumpOptions::new().with_show_types(true));
    assert_eq!(text, "(<invalid type>) x = <could not resolve type>\n");
}

#[test]
fn test_object_description_replaces_children() {
    let flags = TypeFlags::HAS_VALUE | TypeFlags::HAS_CHILDREN | TypeFlags::IS_POINTER | TypeFlags::INSTANCE_IS_POINTER;
    let w = MockValue::new("w", "Widget *", flags)
        .with_value("0x0000000000002000")
        .with_pointer(0x2000)
        .with_description(Ok(Some("<Widget: 0x2000>".to_string())))
        .rc();
    w.push(&MockValue::scalar("id", "9").rc());

    let options = block_options().with_object_description(true);
    let (_, text) = render(&w, &options);
    assert_eq!(text, "(Widget *) w = 0x0000000000002000 <Widget: 0x2000>\n");

    // without descriptions the instance pointer expands in default mode
    let (_, text) = render(&w, &block_options());
    assert_eq!(text, "(Widget *) w = 0x0000000000002000 {\n  id = 9\n}\n");
}

#[test]
fn test_failed_description_falls_back_to_children() {
    let flags = TypeFlags::HAS_VALUE | TypeFlags::HAS_CHILDREN | TypeFlags::IS_POINTER | TypeFlags::INSTANCE_IS_POINTER;
    let w = MockValue::new("w", "Widget *", flags)
        .with_value("0x0000000000002000")
        .with_pointer(0x2000)
        .with_description(Err(ValueError::Description("runtime unavailable".to_string())))
        .rc();
    w.push(&MockValue::scalar("id", "9").rc());

    let (_, text) = render(&w, &block_options().with_object_description(true));
    assert_eq!(
        text,
        "(Widget *) w = 0x0000000000002000 <object description unavailable: runtime unavailable> {\n  id = 9\n}\n"
    );
}

#[test]
fn test_missing_description_falls_back_to_value() {
    let flags = TypeFlags::HAS_VALUE | TypeFlags::HAS_CHILDREN | TypeFlags::IS_POINTER | TypeFlags::INSTANCE_IS_POINTER;
    let w = MockValue::new("w", "Widget *", flags)
        .with_value("0x0000000000002000")
        .with_pointer(0x2000)
        .with_description(Ok(None))
        .rc();
    w.push(&MockValue::scalar("id", "9").rc());

    let options = block_options().with_hide_value(true).with_object_description(true);
    let (_, text) = render(&w, &options);
    assert_eq!(text, "(Widget *) w = 0x0000000000002000\n");

    // nothing to fall back on either: the children are shown instead
    let blank = MockValue::new("w", "Widget *", flags)
        .with_value("")
        .with_pointer(0x2000)
        .with_description(Ok(None))
        .rc();
    blank.push(&MockValue::scalar("id", "9").rc());
    let (_, text) = render(&blank, &options);
    // hidden values stay hidden on the children
    assert_eq!(text, "(Widget *) w = {\n  id =\n}\n");
}

#[test]
fn test_nil_object() {
    let flags = TypeFlags::HAS_VALUE | TypeFlags::HAS_CHILDREN | TypeFlags::IS_POINTER | TypeFlags::INSTANCE_IS_POINTER;
    let w = MockValue::new("w", "Widget *", flags)
        .with_value("0x0000000000000000")
        .with_pointer(0)
        .nil()
        .rc();

    let (_, text) = render(&w, &DumpOptions::new());
    assert_eq!(text, "(Widget *) w = nil\n");
}

#[test]
fn test_one_liner() {
    let p = MockValue::aggregate("p", "Point").rc();
    p.push(&MockValue::scalar("x", "1").rc());
    p.push(&MockValue::scalar("y", "2").rc());

    let (_, text) = render(&p, &DumpOptions::new());
    assert_eq!(text, "(Point) p = (x = 1, y = 2)\n");

    let (_, text) = render(&p, &DumpOptions::new().with_show_types(true));
    assert_eq!(text, "(Point) p = {\n  (int) x = 1\n  (int) y = 2\n}\n");
}

#[test]
fn test_one_liner_rejects_long_names() {
    let p = MockValue::aggregate("p", "Wide").rc();
    for name in ["a_rather_long_member_name", "another_rather_long_member_name"] {
        p.push(&MockValue::scalar(name, "0").rc());
    }
    assert!(!should_print_as_one_liner(p.as_ref(), &DumpOptions::new()));
}

#[test]
fn test_nested_one_liner() {
    let line = MockValue::aggregate("l", "Line").rc();
    let from = MockValue::aggregate("from", "Point").rc();
    from.push(&MockValue::scalar("x", "1").rc());
    from.push(&MockValue::scalar("y", "2").rc());
    line.push(&from);

    assert!(!should_print_as_one_liner(line.as_ref(), &DumpOptions::new()));

    let options = DumpOptions::new().with_oneliner_nested(true);
    assert!(should_print_as_one_liner(line.as_ref(), &options));
    let (_, text) = render(&line, &options);
    assert_eq!(text, "(Line) l = (from = (x = 1, y = 2))\n");
}

#[test]
fn test_flat_output() {
    let s = MockValue::aggregate("s", "S").with_path("s").rc();
    let b = MockValue::aggregate("b", "B").with_path("s.b").rc();
    s.push(&MockValue::scalar("a", "1").with_path("s.a").rc());
    b.push(&MockValue::scalar("c", "2").with_path("s.b.c").rc());
    s.push(&b);

    let (_, text) = render(&s, &DumpOptions::new().with_flat_output(true));
    assert_eq!(text, "s.a = 1\ns.b.c = 2\n");
}

#[test]
fn test_pointer_as_array() {
    let p = MockValue::pointer("p", "int *", 0x1000).rc();
    for i in 0..4 {
        let element = MockValue::scalar(&format!("[{}]", i), &(10 + i).to_string()).rc();
        p.array_members.borrow_mut().push(sp(&element));
    }

    let (_, text) = render(&p, &DumpOptions::new().with_element_count(PointerAsArray::new(3)));
    assert_eq!(text, "(int *) p = 0x0000000000001000 {\n  [0] = 10\n  [1] = 11\n  [2] = 12\n}\n");

    let strided = PointerAsArray {
        base_element: 1,
        stride: 2,
        count: 2,
    };
    let (_, text) = render(&p, &DumpOptions::new().with_element_count(strided));
    assert_eq!(text, "(int *) p = 0x0000000000001000 {\n  [1] = 11\n  [3] = 13\n}\n");
}

#[test]
fn test_pointer_as_array_elements_keep_parent_depth() {
    let p = MockValue::pointer("p", "Point *", 0x1000).rc();
    for i in 0..2 {
        let element = MockValue::aggregate(&format!("[{}]", i), "Point").rc();
        element.push(&MockValue::scalar("x", &(i + 1).to_string()).rc());
        p.array_members.borrow_mut().push(sp(&element));
    }
    let options = block_options().with_element_count(PointerAsArray::new(2));

    let (_, text) = render(&p, &options.clone().with_max_depth(1));
    assert_eq!(
        text,
        "(Point *) p = 0x0000000000001000 {\n  [0] = {\n    x = 1\n  }\n  [1] = {\n    x = 2\n  }\n}\n"
    );

    let (_, text) = render(&p, &options.with_max_depth(0));
    assert_eq!(text, "(Point *) p = 0x0000000000001000 {\n  [0] = {...}\n  [1] = {...}\n}\n");
}

#[test]
fn test_root_reference_expands() {
    let r = MockValue::new(
        "r",
        "Point &",
        TypeFlags::HAS_VALUE | TypeFlags::HAS_CHILDREN | TypeFlags::IS_REFERENCE,
    )
    .with_value("0x0000000000003000")
    .with_pointer(0x3000)
    .rc();
    r.push(&MockValue::scalar("x", "1").rc());

    let (_, text) = render(&r, &block_options());
    assert_eq!(text, "(Point &) r = 0x0000000000003000: {\n  x = 1\n}\n");
}

#[test]
fn test_format_override() {
    let x = MockValue::scalar("x", "255").rc();
    let (_, text) = render(&x, &DumpOptions::new().with_format(Format::Hex));
    assert_eq!(text, "(int) x = 0xff\n");
}

#[test]
fn test_decl_options() {
    let x = MockValue::scalar("x", "1").rc();

    let (_, text) = render(&x, &DumpOptions::new().with_hide_root_type(true));
    assert_eq!(text, "x = 1\n");

    let (_, text) = render(&x, &DumpOptions::new().with_root_name("renamed"));
    assert_eq!(text, "(int) renamed = 1\n");

    let (_, text) = render(&x, &DumpOptions::new().with_hide_value(true));
    assert_eq!(text, "(int) x =\n");

    let helper: DeclPrintingHelper = Rc::new(|type_name: &str, name: &str, _: &DumpOptions, stream: &mut Stream| {
        stream.put_str(&format!("{}: {} :=", name, type_name));
        true
    });
    let (_, text) = render(&x, &DumpOptions::new().with_decl_printing_helper(helper));
    assert_eq!(text, "x: int := 1\n");
}

#[test]
fn test_dynamic_resolution() {
    let base = MockValue::pointer("obj", "Base *", 0x5000).rc();
    let derived = MockValue::pointer("obj", "Derived *", 0x5000).rc();
    *base.dynamic.borrow_mut() = Some(sp(&derived));

    let (_, text) = render(&base, &DumpOptions::new());
    assert_eq!(text, "(Derived *) obj = 0x0000000000005000\n");

    let (_, text) = render(&base, &DumpOptions::new().with_dynamic(false));
    assert_eq!(text, "(Base *) obj = 0x0000000000005000\n");
}

#[test]
fn test_synthetic_children() {
    let s = MockValue::aggregate("s", "S").rc();
    s.push(&MockValue::scalar("a", "1").rc());
    s.push(&MockValue::scalar("b", "2").rc());
    s.push(&MockValue::scalar("c", "3").rc());
    let filtered = SyntheticValue::new(sp(&s), Rc::new(ChildFilter::new(["c"])));
    *s.synthetic.borrow_mut() = Some(Rc::new(filtered));

    let (_, text) = render(&s, &DumpOptions::new());
    assert_eq!(text, "(S) s = (c = 3)\n");

    let (_, text) = render(&s, &DumpOptions::new().with_synthetic(false));
    assert_eq!(text, "(S) s = (a = 1, b = 2, c = 3)\n");
}

#[test]
fn test_resolution_is_bounded() {
    // two values that keep offering each other as their dynamic form
    let a = MockValue::pointer("a", "Base *", 0x1).rc();
    let b = MockValue::pointer("a", "Base *", 0x1).rc();
    *a.dynamic.borrow_mut() = Some(sp(&b));
    *b.dynamic.borrow_mut() = Some(sp(&a));

    let resolved = resolve_most_specialized(sp(&a), true, true);
    assert_eq!(resolved.name(), "a");
}

#[test]
fn test_panicking_summary_is_contained() {
    let s = MockValue::aggregate("s", "S")
        .with_summary(FnSummary::new(|_| panic!("formatter bug")))
        .rc();

    let mut stream = Stream::new();
    stream.set_indent_level(2);
    let printed = print_value_object(&sp(&s), &mut stream, &DumpOptions::new());
    assert!(!printed);
    assert_eq!(stream.indent_level(), 2);
    assert!(stream.at_line_start());
    assert!(stream.as_str().starts_with("    (S) s ="));
}

#[test]
fn test_location_prefix() {
    let p = MockValue::pointer("p", "int *", 0x1000).rc();
    let (_, text) = render(&p, &DumpOptions::new().with_show_location(true));
    assert_eq!(text, "0x0000000000001000: (int *) p = 0x0000000000001000\n");
}
