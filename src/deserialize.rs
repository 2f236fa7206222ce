//! Deserialize synthesizer.
//!
//! Every member is read into a local named after it, in declaration order,
//! before anything is constructed. Concrete classes then construct, assign
//! the members the constructor did not consume and return. Base classes
//! dispatch on the discriminator to a child routine first and assign their
//! own members onto whatever the child produced.

use crate::config::GeneratorConfig;
use crate::ir::{
    Argument, CaseTarget, DeserializeOp, DeserializeRoutine, Dispatch, DispatchCase,
    DispatchDefault, Holder, ReadField, Transfer,
};
use crate::registry::{Registry, ResolvedBase, ResolvedConcrete};
use crate::schema::{MemberVariable, OwnershipKind};

pub fn synthesize_concrete(
    registry: &Registry,
    class: &ResolvedConcrete,
    config: &GeneratorConfig,
) -> DeserializeRoutine {
    let schema = &class.schema;
    let parent = registry.parent_of(class);

    let mut ops = schema
        .members
        .iter()
        .map(|m| DeserializeOp::ReadField(read_field(m)))
        .collect::<Vec<_>>();

    let constructed = schema.return_type.clone().unwrap_or_else(|| schema.name.clone());
    let args = schema
        .constructor
        .iter()
        .filter_map(|name| schema.member(name))
        .map(|m| Argument {
            name: m.name.clone(),
            transfer: Transfer::for_move(m.requires_move()),
        })
        .chain(class.extra_parameters.iter().map(|p| Argument {
            name: p.name.clone(),
            transfer: Transfer::Copy,
        }))
        .collect();
    ops.push(DeserializeOp::Construct {
        holder: Holder {
            class: constructed,
            ownership: class.ownership,
        },
        args,
    });

    ops.extend(
        schema
            .members
            .iter()
            .filter(|m| !schema.in_constructor(&m.name))
            .map(|m| assign(m, class.ownership, config)),
    );
    ops.push(DeserializeOp::Return {
        upcast: parent.is_some(),
    });

    let nominal = schema
        .return_type
        .clone()
        .or_else(|| parent.map(|p| p.schema.name.clone()))
        .unwrap_or_else(|| schema.name.clone());
    DeserializeRoutine {
        class: schema.name.clone(),
        returns: Holder {
            class: nominal,
            ownership: class.ownership,
        },
        parameters: class.extra_parameters.clone(),
        ops,
    }
}

pub fn synthesize_base(
    registry: &Registry,
    base: &ResolvedBase,
    config: &GeneratorConfig,
) -> DeserializeRoutine {
    let schema = &base.schema;

    // shared members precede the branch on the discriminator
    let mut ops = schema
        .members
        .iter()
        .map(|m| DeserializeOp::ReadField(read_field(m)))
        .collect::<Vec<_>>();

    ops.push(DeserializeOp::DeclareResult {
        holder: Holder {
            class: schema.name.clone(),
            ownership: schema.ownership,
        },
    });

    let extra_arguments = base
        .extra_parameters
        .iter()
        .map(|p| p.name.clone())
        .collect::<Vec<_>>();
    let cases = registry
        .children_of(base.name())
        .map(|(literal, child)| DispatchCase {
            literal: literal.to_string(),
            target: match &child.schema.custom_dispatch_body {
                Some(body) => CaseTarget::Custom { body: body.clone() },
                None => CaseTarget::Call {
                    class: child.schema.name.clone(),
                    extra_arguments: extra_arguments.clone(),
                },
            },
        })
        .collect();
    ops.push(DeserializeOp::Dispatch(Dispatch {
        base: schema.name.clone(),
        discriminator: base.discriminator_member.clone(),
        enum_type: base.discriminator_type.raw.clone(),
        cases,
        default: DispatchDefault::UnsupportedDiscriminator,
    }));

    ops.extend(
        schema
            .members
            .iter()
            .filter(|m| !base.is_dispatch_input(m))
            .map(|m| assign(m, schema.ownership, config)),
    );
    ops.push(DeserializeOp::Return { upcast: false });

    DeserializeRoutine {
        class: schema.name.clone(),
        returns: Holder {
            class: schema.return_type.clone().unwrap_or_else(|| schema.name.clone()),
            ownership: schema.ownership,
        },
        parameters: Vec::new(),
        ops,
    }
}

fn read_field(member: &MemberVariable) -> ReadField {
    ReadField {
        local: member.name.clone(),
        key: member.deserialize_key.clone(),
        ty: member.ty.clone(),
        optional: member.optional,
        downcast_from: member.base_override.clone(),
    }
}

fn assign(member: &MemberVariable, ownership: OwnershipKind, config: &GeneratorConfig) -> DeserializeOp {
    DeserializeOp::Assign {
        field: member.name.clone(),
        transfer: Transfer::for_move(member.requires_move() || config.is_movable(&member.ty.raw)),
        through_pointer: ownership.is_indirect(),
    }
}
