//! Path resolution: write a value or ensure a container at a typed path,
//! creating missing ancestors on the way.
//!
//! A newly created ancestor is an array when the step it will hold is an
//! index, otherwise an object. `null` slots (including array padding) count
//! as vacant. Every write is checked read-only first, so a rejected write
//! leaves the tree exactly as it was.

use json_stitch_path::PathStep;
use serde_json::{Map, Value};

use crate::error::SkipReason;
use crate::options::StitchOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    Object,
    Array,
}

impl ContainerKind {
    /// The container needed to hold `step`.
    fn holding(step: &PathStep) -> Self {
        if step.is_index() {
            ContainerKind::Array
        } else {
            ContainerKind::Object
        }
    }

    fn empty(self) -> Value {
        match self {
            ContainerKind::Object => Value::Object(Map::new()),
            ContainerKind::Array => Value::Array(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Write {
    /// Create the container if the slot is vacant, otherwise leave it alone.
    Ensure(ContainerKind),
    /// Overwrite the slot.
    Set(Value),
}

pub(crate) fn write_at(
    root: &mut Option<Value>,
    path: &[PathStep],
    write: Write,
    options: &StitchOptions,
) -> Result<(), SkipReason> {
    check(root.as_ref(), path, options)?;

    let mut slot = root.get_or_insert(Value::Null);
    for step in path {
        if slot.is_null() {
            *slot = ContainerKind::holding(step).empty();
        }
        slot = child_slot(slot, step, options)?;
    }

    match write {
        Write::Ensure(kind) => {
            if slot.is_null() {
                *slot = kind.empty();
            }
        }
        Write::Set(value) => *slot = value,
    }
    Ok(())
}

/// Dry run of [`write_at`]'s walk.
fn check(root: Option<&Value>, path: &[PathStep], options: &StitchOptions) -> Result<(), SkipReason> {
    let mut node = root.filter(|v| !v.is_null());
    for (depth, step) in path.iter().enumerate() {
        let Some(current) = node else {
            // Everything from here down is created fresh.
            return path[depth..].iter().try_for_each(|step| check_gap(step, 0, options));
        };
        let child = match (current, step) {
            (Value::Object(map), PathStep::Key(key)) => map.get(key),
            (Value::Array(arr), PathStep::Index(index)) => {
                check_gap(step, arr.len(), options)?;
                arr.get(*index)
            }
            (other, _) => {
                return Err(SkipReason::KindMismatch {
                    step: step.clone(),
                    found: kind_name(other),
                })
            }
        };
        node = child.filter(|v| !v.is_null());
    }
    Ok(())
}

fn check_gap(step: &PathStep, len: usize, options: &StitchOptions) -> Result<(), SkipReason> {
    match step {
        PathStep::Index(index) if index.saturating_sub(len) > options.index_gap_limit() => {
            Err(SkipReason::IndexGap { index: *index, len })
        }
        _ => Ok(()),
    }
}

fn child_slot<'a>(
    node: &'a mut Value,
    step: &PathStep,
    options: &StitchOptions,
) -> Result<&'a mut Value, SkipReason> {
    match (node, step) {
        (Value::Object(map), PathStep::Key(key)) => Ok(map.entry(key.as_str()).or_insert(Value::Null)),
        (Value::Array(arr), PathStep::Index(index)) => {
            check_gap(step, arr.len(), options)?;
            let needed = index.checked_add(1).ok_or(SkipReason::IndexGap {
                index: *index,
                len: arr.len(),
            })?;
            if needed > arr.len() {
                arr.resize(needed, Value::Null);
            }
            Ok(&mut arr[*index])
        }
        (other, _) => Err(SkipReason::KindMismatch {
            step: step.clone(),
            found: kind_name(other),
        }),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
