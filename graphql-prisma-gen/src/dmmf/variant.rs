//! Input type variant selection
//!
//! The raw schema lists several candidate types for most input fields and
//! arguments (object vs scalar shorthand, checked vs unchecked, list vs
//! single). Exactly one is exposed, chosen by a fixed precedence:
//!
//! 1. object candidates (minus unchecked ones unless unchecked inputs are
//!    enabled, minus compound-operation shapes when simple inputs are enabled)
//! 2. otherwise non-null scalars, then enums, then whatever remains
//! 3. among survivors: a list candidate, else an unchecked candidate when
//!    unchecked inputs are enabled, else the first

use super::raw::{Location, TypeRef};

/// Compound-operation shapes hidden in simple-input mode
const COMPOUND_OPERATION_MARKERS: &[&str] = &["FieldUpdateOperationsInput", "EnvelopeInput"];

const UNCHECKED_MARKER: &str = "Unchecked";

/// Variant selection switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantMode {
    pub simple_inputs: bool,
    pub unchecked_inputs: bool,
}

/// Pick the one candidate to expose; `None` only when there are no usable candidates
pub fn select_input_type_variant(candidates: &[TypeRef], mode: VariantMode) -> Option<&TypeRef> {
    let usable: Vec<&TypeRef> = candidates
        .iter()
        .filter(|c| c.location != Location::FieldRefTypes)
        .collect();

    let objects: Vec<&TypeRef> = usable
        .iter()
        .copied()
        .filter(|c| c.location == Location::InputObjectTypes)
        .filter(|c| mode.unchecked_inputs || !c.type_name.contains(UNCHECKED_MARKER))
        .filter(|c| {
            !mode.simple_inputs
                || !COMPOUND_OPERATION_MARKERS
                    .iter()
                    .any(|marker| c.type_name.contains(marker))
        })
        .collect();

    let survivors = if !objects.is_empty() {
        objects
    } else {
        let scalars: Vec<&TypeRef> = usable
            .iter()
            .copied()
            .filter(|c| c.location == Location::Scalar && c.type_name != "Null")
            .collect();
        if !scalars.is_empty() {
            scalars
        } else {
            let enums: Vec<&TypeRef> = usable
                .iter()
                .copied()
                .filter(|c| c.location == Location::EnumTypes)
                .collect();
            if !enums.is_empty() { enums } else { usable }
        }
    };

    survivors
        .iter()
        .find(|c| c.is_list)
        .or_else(|| {
            mode.unchecked_inputs
                .then(|| survivors.iter().find(|c| c.type_name.contains(UNCHECKED_MARKER)))
                .flatten()
        })
        .or_else(|| survivors.first())
        .copied()
}
