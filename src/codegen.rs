//! C++ spelling of an [`Artifact`].
//!
//! Purely mechanical: every semantic decision has already been made by the
//! time operations reach this module.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{
    Argument, Artifact, CaseTarget, ClassBody, DeserializeOp, DeserializeRoutine, Dispatch,
    DispatchDefault, Holder, ReadField, SerializeOp, SerializeRoutine, Transfer,
};
use crate::schema::OwnershipKind;

const SERIALIZE_FN: &str = "FormatSerialize";
const DESERIALIZE_FN: &str = "FormatDeserialize";
const SERIALIZER: &str = "FormatSerializer";
const DESERIALIZER: &str = "FormatDeserializer";
const RULE: &str = "//===----------------------------------------------------------------------===//";

#[allow(clippy::expect_used)] // literal pattern
static OWNING_POINTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9_:]+)\s*\*").expect("owning pointer pattern compiles"));

/// `Foo*` → `unique_ptr<Foo>`, also inside template arguments.
pub fn spell_type(raw: &str) -> String {
    OWNING_POINTER
        .replace_all(raw.trim(), "unique_ptr<${1}>")
        .into_owned()
}

pub struct Codegen {
    out: String,
    namespace: String,
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

impl Codegen {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            namespace: String::new(),
        }
    }

    pub fn emit(&mut self, artifact: &Artifact) {
        self.namespace = artifact.namespace.clone();
        self.raw_line(RULE);
        self.raw_line(&format!("// This file is automatically generated by {}", artifact.generator));
        self.raw_line("// Do not edit this file manually, your changes will be overwritten");
        self.raw_line(RULE);
        self.raw_line("");
        for include in &artifact.includes {
            self.raw_line(&format!("#include \"{include}\""));
        }
        self.raw_line("");
        self.raw_line(&format!("namespace {} {{", artifact.namespace));
        for body in &artifact.bodies {
            self.emit_body(body);
        }
        self.raw_line("");
        self.raw_line(&format!("}} // namespace {}", artifact.namespace));
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn emit_body(&mut self, body: &ClassBody) {
        self.emit_serialize(&body.serialize);
        self.emit_deserialize(&body.deserialize);
    }

    fn emit_serialize(&mut self, routine: &SerializeRoutine) {
        self.raw_line("");
        self.raw_line(&format!(
            "void {}::{SERIALIZE_FN}({SERIALIZER} &serializer) const {{",
            routine.class
        ));
        for op in &routine.ops {
            match op {
                SerializeOp::DelegateToBase { base } => {
                    self.line(1, &format!("{base}::{SERIALIZE_FN}(serializer);"));
                }
                SerializeOp::WriteField { key, field, optional, deref, upcast } => {
                    let method = if *optional { "WriteOptionalProperty" } else { "WriteProperty" };
                    let value = match (deref, upcast) {
                        (true, Some(base)) => format!("({} &)*{field}", strip_pointer(base)),
                        (true, None) => format!("*{field}"),
                        (false, _) => field.clone(),
                    };
                    self.line(1, &format!("serializer.{method}(\"{key}\", {value});"));
                }
            }
        }
        self.raw_line("}");
    }

    fn emit_deserialize(&mut self, routine: &DeserializeRoutine) {
        let parameters = routine
            .parameters
            .iter()
            .map(|p| format!("{} {}, ", spell_type(&p.ty.raw), p.name))
            .collect::<String>();
        self.raw_line("");
        self.raw_line(&format!(
            "{} {}::{DESERIALIZE_FN}({parameters}{DESERIALIZER} &deserializer) {{",
            holder_type(&routine.returns),
            routine.class
        ));
        for op in &routine.ops {
            match op {
                DeserializeOp::ReadField(read) => self.emit_read(read),
                DeserializeOp::DeclareResult { holder } => {
                    self.line(1, &format!("{} result;", holder_type(holder)));
                }
                DeserializeOp::Construct { holder, args } => self.emit_construct(holder, args),
                DeserializeOp::Dispatch(dispatch) => self.emit_dispatch(dispatch),
                DeserializeOp::Assign { field, transfer, through_pointer } => {
                    let access = if *through_pointer { "->" } else { "." };
                    self.line(1, &format!("result{access}{field} = {};", transfer_expr(field, *transfer)));
                }
                DeserializeOp::Return { upcast } => {
                    if *upcast {
                        self.line(1, "return std::move(result);");
                    } else {
                        self.line(1, "return result;");
                    }
                }
            }
        }
        self.raw_line("}");
    }

    fn emit_read(&mut self, read: &ReadField) {
        let method = if read.optional { "ReadOptionalProperty" } else { "ReadProperty" };
        let line = match &read.downcast_from {
            Some(base) => {
                let base = strip_pointer(base);
                format!(
                    "auto {} = unique_ptr_cast<{base}, {}>(deserializer.{method}<unique_ptr<{base}>>(\"{}\"));",
                    read.local,
                    read.ty.pointee(),
                    read.key
                )
            }
            None => format!(
                "auto {} = deserializer.{method}<{}>(\"{}\");",
                read.local,
                spell_type(&read.ty.raw),
                read.key
            ),
        };
        self.line(1, &line);
    }

    fn emit_construct(&mut self, holder: &Holder, args: &[Argument]) {
        let args = args
            .iter()
            .map(|a| transfer_expr(&a.name, a.transfer))
            .collect::<Vec<_>>()
            .join(", ");
        let line = match holder.ownership {
            OwnershipKind::ByValue if args.is_empty() => format!("{} result;", holder.class),
            OwnershipKind::ByValue => format!("{} result({args});", holder.class),
            OwnershipKind::UniqueOwning | OwnershipKind::SharedOwning => format!(
                "auto result = {}::{}(new {}({args}));",
                self.namespace,
                holder_type(holder),
                holder.class
            ),
        };
        self.line(1, &line);
    }

    fn emit_dispatch(&mut self, dispatch: &Dispatch) {
        let enum_type = spell_type(&dispatch.enum_type);
        self.line(1, &format!("switch ({}) {{", dispatch.discriminator));
        for case in &dispatch.cases {
            self.line(1, &format!("case {enum_type}::{}:", case.literal));
            match &case.target {
                CaseTarget::Call { class, extra_arguments } => {
                    let extra = extra_arguments
                        .iter()
                        .map(|a| format!("{a}, "))
                        .collect::<String>();
                    self.line(2, &format!("result = {class}::{DESERIALIZE_FN}({extra}deserializer);"));
                }
                CaseTarget::Custom { body } => {
                    for line in body.replace("\\n", "\n").lines() {
                        self.line(2, line);
                    }
                }
            }
            self.line(2, "break;");
        }
        self.line(1, "default:");
        match dispatch.default {
            DispatchDefault::UnsupportedDiscriminator => self.line(
                2,
                &format!(
                    "throw SerializationException(\"Unsupported type for deserialization of {}!\");",
                    dispatch.base
                ),
            ),
        }
        self.line(1, "}");
    }

    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn raw_line(&mut self, text: &str) {
        self.line(0, text);
    }
}

/// Render a whole artifact to text.
pub fn render(artifact: &Artifact) -> String {
    let mut cg = Codegen::new();
    cg.emit(artifact);
    cg.into_string()
}

fn holder_type(holder: &Holder) -> String {
    match holder.ownership {
        OwnershipKind::ByValue => holder.class.clone(),
        OwnershipKind::UniqueOwning => format!("unique_ptr<{}>", holder.class),
        OwnershipKind::SharedOwning => format!("shared_ptr<{}>", holder.class),
    }
}

fn transfer_expr(name: &str, transfer: Transfer) -> String {
    match transfer {
        Transfer::Move => format!("std::move({name})"),
        Transfer::Copy => name.to_string(),
    }
}

fn strip_pointer(name: &str) -> &str {
    name.trim().trim_end_matches('*').trim()
}

#[cfg(test)]
#[path = "codegen/codegen_tests.rs"]
mod codegen_tests;
