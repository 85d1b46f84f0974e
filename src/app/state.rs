//! Session state
//!
//! The target being inspected plus the dump options every print uses.

use std::rc::Rc;

use thiserror::Error;

use crate::core::Stream;
use crate::printer::{print_value_object, DumpOptions, PointerDepth, PointerDepthMode};
use crate::target::Target;
use crate::value::Format;

/// Errors from session commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("No variable named '{0}'")]
    UnknownVariable(String),

    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    #[error("Invalid value '{value}' for option '{option}'")]
    InvalidValue { option: String, value: String },
}

/// Options accepted by `set`, with a short description
pub const SETTINGS: &[(&str, &str)] = &[
    ("max-depth", "Aggregate nesting levels to expand"),
    ("ptr-depth", "Pointer hops to follow"),
    ("ptr-mode", "Pointer budget mode: always, default, never"),
    ("max-children", "Children printed before '...'"),
    ("ignore-cap", "Print every child regardless of max-children"),
    ("types", "Show types on every line"),
    ("location", "Prefix lines with the value's address"),
    ("flat", "Print leaves as full expression paths"),
    ("oneline", "Allow short aggregates on a single line"),
    ("nested", "Allow one-line children inside one-liners"),
    ("validate", "Run type validators"),
    ("describe", "Ask the runtime for object descriptions"),
    ("dynamic", "Show dynamic (most derived) types"),
    ("synthetic", "Use synthetic children providers"),
    ("format", "Default scalar format: default, x, d, b, c, y, B"),
    ("color", "Colorize annotations"),
];

/// Shared session state
pub struct AppState {
    pub target: Rc<Target>,
    pub options: DumpOptions,
}

impl AppState {
    pub fn new(target: Rc<Target>, options: DumpOptions) -> Self {
        Self { target, options }
    }

    /// Names of all variables, in declaration order
    pub fn variable_names(&self) -> Vec<String> {
        self.target.variables().iter().map(|v| v.name.clone()).collect()
    }

    /// Render one variable
    pub fn print_variable(&self, name: &str, format: Option<Format>) -> Result<String, AppError> {
        let valobj = self
            .target
            .variable(name)
            .ok_or_else(|| AppError::UnknownVariable(name.to_string()))?;

        let mut options = self.options.clone();
        if let Some(format) = format {
            options = options.with_format(format);
        }

        let mut stream = Stream::new();
        if !print_value_object(&valobj, &mut stream, &options) {
            log::debug!("'{}' printed with errors", name);
        }
        Ok(stream.into_string())
    }

    /// Render every variable
    pub fn print_all(&self) -> String {
        let mut stream = Stream::new();
        for valobj in self.target.all_variables() {
            print_value_object(&valobj, &mut stream, &self.options);
        }
        stream.into_string()
    }

    /// Apply `set <option> <value>`
    pub fn apply_setting(&mut self, option: &str, value: &str) -> Result<(), AppError> {
        let invalid = || AppError::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
        };
        let number = || value.parse::<u32>().map_err(|_| invalid());
        let flag = || parse_bool(value).ok_or_else(invalid);

        let opts = &mut self.options;
        match option {
            "max-depth" => opts.max_depth = number()?,
            "ptr-depth" => opts.max_ptr_depth.count = number()?,
            "ptr-mode" => {
                opts.max_ptr_depth.mode = match value {
                    "always" => PointerDepthMode::Always,
                    "default" => PointerDepthMode::Default,
                    "never" => PointerDepthMode::Never,
                    _ => return Err(invalid()),
                }
            }
            "max-children" => opts.max_children = number()? as usize,
            "ignore-cap" => opts.ignore_cap = flag()?,
            "types" => opts.show_types = flag()?,
            "location" => opts.show_location = flag()?,
            "flat" => opts.flat_output = flag()?,
            "oneline" => opts.allow_oneliner = flag()?,
            "nested" => opts.oneliner_nested = flag()?,
            "validate" => opts.run_validator = flag()?,
            "describe" => opts.use_object_description = flag()?,
            "dynamic" => opts.use_dynamic = flag()?,
            "synthetic" => opts.use_synthetic = flag()?,
            "format" => opts.format = Format::from_code(value).ok_or_else(invalid)?,
            "color" => opts.use_color = flag()?,
            _ => return Err(AppError::UnknownOption(option.to_string())),
        }
        log::debug!("Set {} = {}", option, value);
        Ok(())
    }

    /// Current value of every setting, in `SETTINGS` order
    pub fn settings(&self) -> Vec<(&'static str, String)> {
        let o = &self.options;
        let PointerDepth { mode, count } = o.max_ptr_depth;
        let mode = match mode {
            PointerDepthMode::Always => "always",
            PointerDepthMode::Default => "default",
            PointerDepthMode::Never => "never",
        };
        let max_depth = if o.max_depth == u32::MAX {
            "unlimited".to_string()
        } else {
            o.max_depth.to_string()
        };
        vec![
            ("max-depth", max_depth),
            ("ptr-depth", count.to_string()),
            ("ptr-mode", mode.to_string()),
            ("max-children", o.max_children.to_string()),
            ("ignore-cap", o.ignore_cap.to_string()),
            ("types", o.show_types.to_string()),
            ("location", o.show_location.to_string()),
            ("flat", o.flat_output.to_string()),
            ("oneline", o.allow_oneliner.to_string()),
            ("nested", o.oneliner_nested.to_string()),
            ("validate", o.run_validator.to_string()),
            ("describe", o.use_object_description.to_string()),
            ("dynamic", o.use_dynamic.to_string()),
            ("synthetic", o.use_synthetic.to_string()),
            ("format", o.format.to_string()),
            ("color", o.use_color.to_string()),
        ]
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
