//! Dump options - configuration for one top-level print
//!
//! Options are immutable for a top-level call. Each child printer receives a
//! clone adjusted for its position (see `DumpOptions::for_child`).

use std::fmt;
use std::rc::Rc;

use crate::core::Stream;
use crate::value::{Format, SummaryFormatter};

/// How pointer expansion is budgeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerDepthMode {
    /// Every pointer follows the count strictly
    Always,
    /// Named pointers follow the count; anonymous instance pointers
    /// (container elements) may expand past it
    #[default]
    Default,
    /// Never expand pointers
    Never,
}

/// Budget of pointer hops left to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerDepth {
    pub mode: PointerDepthMode,
    pub count: u32,
}

impl PointerDepth {
    pub const fn new(mode: PointerDepthMode, count: u32) -> Self {
        Self { mode, count }
    }

    pub fn can_allow_expansion(&self) -> bool {
        match self.mode {
            PointerDepthMode::Always | PointerDepthMode::Default => self.count > 0,
            PointerDepthMode::Never => false,
        }
    }

    /// Budget after following one pointer
    pub fn decremented(self) -> Self {
        Self {
            mode: self.mode,
            count: self.count.saturating_sub(1),
        }
    }
}

/// View a pointer as `count` elements starting at `base`, every `stride`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerAsArray {
    pub base_element: usize,
    pub stride: usize,
    pub count: usize,
}

impl PointerAsArray {
    pub const fn new(count: usize) -> Self {
        Self {
            base_element: 0,
            stride: 1,
            count,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.count > 0
    }

    pub fn physical_index(&self, logical: usize) -> usize {
        self.base_element + logical * self.stride
    }
}

/// Custom declaration renderer: `(type, name, options, stream) -> handled`
pub type DeclPrintingHelper = Rc<dyn Fn(&str, &str, &DumpOptions, &mut Stream) -> bool>;

/// Options for a value dump
#[derive(Clone)]
pub struct DumpOptions {
    pub max_depth: u32,
    pub max_ptr_depth: PointerDepth,
    /// Children printed before eliding with `...`
    pub max_children: usize,
    pub ignore_cap: bool,

    pub show_types: bool,
    pub show_location: bool,
    pub hide_root_type: bool,
    pub hide_name: bool,
    pub hide_value: bool,
    pub hide_pointer_value: bool,
    pub use_type_display_name: bool,

    /// One line per leaf, named by expression path
    pub flat_output: bool,
    pub allow_oneliner: bool,
    /// Inside a one-liner, render nested aggregates as nested one-liners
    /// instead of refusing the one-line form
    pub oneliner_nested: bool,
    pub reveal_empty_aggregates: bool,

    /// Levels below this one at which summaries are skipped
    pub omit_summary_depth: u32,
    /// Summary applied instead of the value's attached one (root only)
    pub summary: Option<Rc<dyn SummaryFormatter>>,
    pub root_name: Option<String>,
    pub format: Format,
    pub element_count: PointerAsArray,

    pub use_dynamic: bool,
    pub use_synthetic: bool,
    pub run_validator: bool,
    /// Marker written before values that passed validation
    pub validation_pass_marker: Option<String>,
    pub use_object_description: bool,
    pub scope_checked: bool,
    pub use_color: bool,

    pub decl_printing_helper: Option<DeclPrintingHelper>,
}

impl DumpOptions {
    /// Default cap on printed children
    pub const DEFAULT_MAX_CHILDREN: usize = 256;

    pub fn new() -> Self {
        Self {
            max_depth: u32::MAX,
            max_ptr_depth: PointerDepth::default(),
            max_children: Self::DEFAULT_MAX_CHILDREN,
            ignore_cap: false,
            show_types: false,
            show_location: false,
            hide_root_type: false,
            hide_name: false,
            hide_value: false,
            hide_pointer_value: false,
            use_type_display_name: true,
            flat_output: false,
            allow_oneliner: true,
            oneliner_nested: false,
            reveal_empty_aggregates: false,
            omit_summary_depth: 0,
            summary: None,
            root_name: None,
            format: Format::Default,
            element_count: PointerAsArray::default(),
            use_dynamic: true,
            use_synthetic: true,
            run_validator: false,
            validation_pass_marker: None,
            use_object_description: false,
            scope_checked: false,
            use_color: false,
            decl_printing_helper: None,
        }
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_ptr_depth(mut self, ptr_depth: PointerDepth) -> Self {
        self.max_ptr_depth = ptr_depth;
        self
    }

    pub fn with_max_children(mut self, max: usize) -> Self {
        self.max_children = max;
        self
    }

    pub fn with_ignore_cap(mut self, ignore: bool) -> Self {
        self.ignore_cap = ignore;
        self
    }

    pub fn with_show_types(mut self, show: bool) -> Self {
        self.show_types = show;
        self
    }

    pub fn with_show_location(mut self, show: bool) -> Self {
        self.show_location = show;
        self
    }

    pub fn with_hide_root_type(mut self, hide: bool) -> Self {
        self.hide_root_type = hide;
        self
    }

    pub fn with_hide_name(mut self, hide: bool) -> Self {
        self.hide_name = hide;
        self
    }

    pub fn with_hide_value(mut self, hide: bool) -> Self {
        self.hide_value = hide;
        self
    }

    pub fn with_hide_pointer_value(mut self, hide: bool) -> Self {
        self.hide_pointer_value = hide;
        self
    }

    pub fn with_flat_output(mut self, flat: bool) -> Self {
        self.flat_output = flat;
        self
    }

    pub fn with_oneliner(mut self, allow: bool) -> Self {
        self.allow_oneliner = allow;
        self
    }

    pub fn with_oneliner_nested(mut self, nested: bool) -> Self {
        self.oneliner_nested = nested;
        self
    }

    pub fn with_reveal_empty_aggregates(mut self, reveal: bool) -> Self {
        self.reveal_empty_aggregates = reveal;
        self
    }

    pub fn with_omit_summary_depth(mut self, depth: u32) -> Self {
        self.omit_summary_depth = depth;
        self
    }

    pub fn with_summary(mut self, summary: Rc<dyn SummaryFormatter>) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = Some(name.into());
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_element_count(mut self, element_count: PointerAsArray) -> Self {
        self.element_count = element_count;
        self
    }

    pub fn with_dynamic(mut self, use_dynamic: bool) -> Self {
        self.use_dynamic = use_dynamic;
        self
    }

    pub fn with_synthetic(mut self, use_synthetic: bool) -> Self {
        self.use_synthetic = use_synthetic;
        self
    }

    pub fn with_validation(mut self, run: bool) -> Self {
        self.run_validator = run;
        self
    }

    pub fn with_validation_pass_marker(mut self, marker: impl Into<String>) -> Self {
        self.validation_pass_marker = Some(marker.into());
        self
    }

    pub fn with_object_description(mut self, use_description: bool) -> Self {
        self.use_object_description = use_description;
        self
    }

    pub fn with_scope_checked(mut self, checked: bool) -> Self {
        self.scope_checked = checked;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.use_color = color;
        self
    }

    pub fn with_decl_printing_helper(mut self, helper: DeclPrintingHelper) -> Self {
        self.decl_printing_helper = Some(helper);
        self
    }

    /// Options handed to a child printer. `consumed_depth` is the number of
    /// aggregate levels the child sits below its parent (0 for pointer-as-array
    /// elements).
    pub fn for_child(&self, consumed_depth: u32) -> Self {
        let mut child = self.clone();
        child.summary = None;
        child.root_name = None;
        child.scope_checked = true;
        child.omit_summary_depth = if self.omit_summary_depth > 1 {
            self.omit_summary_depth - consumed_depth
        } else {
            0
        };
        child.element_count = PointerAsArray::default();
        child
    }
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DumpOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DumpOptions")
            .field("max_depth", &self.max_depth)
            .field("max_ptr_depth", &self.max_ptr_depth)
            .field("max_children", &self.max_children)
            .field("ignore_cap", &self.ignore_cap)
            .field("show_types", &self.show_types)
            .field("show_location", &self.show_location)
            .field("flat_output", &self.flat_output)
            .field("allow_oneliner", &self.allow_oneliner)
            .field("oneliner_nested", &self.oneliner_nested)
            .field("omit_summary_depth", &self.omit_summary_depth)
            .field("format", &self.format)
            .field("element_count", &self.element_count)
            .field("use_dynamic", &self.use_dynamic)
            .field("use_synthetic", &self.use_synthetic)
            .field("run_validator", &self.run_validator)
            .field("use_object_description", &self.use_object_description)
            .field("use_color", &self.use_color)
            .finish_non_exhaustive()
    }
}
