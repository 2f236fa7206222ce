//! Serialize renderer: the ordered field writes of one class.
//!
//! Writes follow declaration order exactly; the matching deserialize routine
//! reads in the same order, so nothing here may reorder or merge members.

use crate::ir::{SerializeOp, SerializeRoutine};
use crate::registry::{Registry, ResolvedBase, ResolvedConcrete};
use crate::schema::MemberVariable;

pub fn render_base(base: &ResolvedBase) -> SerializeRoutine {
    SerializeRoutine {
        class: base.schema.name.clone(),
        ops: base.schema.members.iter().map(write_field).collect(),
    }
}

pub fn render_concrete(registry: &Registry, class: &ResolvedConcrete) -> SerializeRoutine {
    let delegate = registry.parent_of(class).map(|parent| SerializeOp::DelegateToBase {
        base: parent.schema.name.clone(),
    });
    SerializeRoutine {
        class: class.schema.name.clone(),
        ops: delegate
            .into_iter()
            .chain(class.schema.members.iter().map(write_field))
            .collect(),
    }
}

fn write_field(member: &MemberVariable) -> SerializeOp {
    let deref = member.ty.is_pointer() && !member.optional;
    SerializeOp::WriteField {
        key: member.serialize_key.clone(),
        field: member.name.clone(),
        optional: member.optional,
        deref,
        // an optional pointer is written through its own virtual serialize
        upcast: member.base_override.clone().filter(|_| deref),
    }
}
