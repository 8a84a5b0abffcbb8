//! Cycle-aware graph construction.
//!
//! Every host type gets one node slot, reserved when its classification
//! starts. The types on the active classification path are tracked in
//! order; meeting one of them again is a cycle. With cycles allowed the
//! reserved (not yet filled) slot is returned, so the back-edge points at the
//! same node. Otherwise the cycle is an invalid declaration.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use log::trace;

use datamodel_core::{EnumDecl, HostKind, HostTypeId, TypeRegistry};

use crate::diagnostics::{DiagnosticKind, ErrorReport, StackFrame};
use crate::types::{
    ArrayType, Construction, CustomType, DataType, DataTypeGraph, ExpressionType, FunctionType,
    MemberBinding, NodeId, OpenParameterType, PrimitiveRepr, PrimitiveType, Property,
    QuotationType, StructuralKind, StructuralType,
};

pub(crate) struct GraphBuilder<'r> {
    pub(super) registry: &'r TypeRegistry,
    allow_cycles: bool,
    slots: Vec<Option<DataType>>,
    /// Types on the active path, outermost first, with their reserved slots.
    active: IndexMap<HostTypeId, NodeId>,
    finished: HashMap<HostTypeId, NodeId>,
    /// Types already reported, so each failure is recorded once.
    failed: HashSet<HostTypeId>,
    pub(super) report: ErrorReport,
}

impl<'r> GraphBuilder<'r> {
    pub(crate) fn new(registry: &'r TypeRegistry, allow_cycles: bool) -> Self {
        Self {
            registry,
            allow_cycles,
            slots: Vec::new(),
            active: IndexMap::new(),
            finished: HashMap::new(),
            failed: HashSet::new(),
            report: ErrorReport::new(),
        }
    }

    pub(crate) fn build(mut self, root: HostTypeId) -> Result<DataTypeGraph, ErrorReport> {
        let root_id = self.visit(root);
        if !self.report.is_empty() {
            return Err(self.report);
        }
        let Some(root_id) = root_id else {
            return Err(self.report);
        };
        let nodes: Vec<Arc<DataType>> = self.slots.into_iter().flatten().map(Arc::new).collect();
        debug_assert_eq!(nodes.len(), self.finished.len());
        Ok(DataTypeGraph::from_parts(nodes, root_id))
    }

    /// Classify a constituent type. `None` means it failed and the failure
    /// has already been reported.
    pub(super) fn visit(&mut self, ty: HostTypeId) -> Option<NodeId> {
        if let Some(&id) = self.finished.get(&ty) {
            return Some(id);
        }
        if self.failed.contains(&ty) {
            return None;
        }
        if let Some(&id) = self.active.get(&ty) {
            if self.allow_cycles {
                trace!("back-edge to `{}` at {id}", self.registry.display(ty));
                return Some(id);
            }
            self.report_cycle(ty);
            return None;
        }

        let id = NodeId::from_index(self.slots.len());
        self.slots.push(None);
        self.active.insert(ty, id);
        let node = self.classify_kind(ty, id);
        self.active.pop();

        match node {
            Some(node) => {
                self.slots[id.index()] = Some(node);
                self.finished.insert(ty, id);
                Some(id)
            }
            None => {
                self.failed.insert(ty);
                None
            }
        }
    }

    fn classify_kind(&mut self, ty: HostTypeId, id: NodeId) -> Option<DataType> {
        let registry = self.registry;
        let host = registry.get(ty);
        match &host.kind {
            HostKind::Atom(atom) => Some(DataType::Primitive(PrimitiveType {
                host: ty,
                repr: PrimitiveRepr::Atom(*atom),
                nullable: atom.is_reference(),
            })),
            HostKind::Enum(decl) => {
                if !self.validate_enum(ty, decl) {
                    return None;
                }
                Some(DataType::Primitive(PrimitiveType {
                    host: ty,
                    repr: PrimitiveRepr::Enum(ty),
                    nullable: false,
                }))
            }
            HostKind::Nullable(inner) => {
                let repr = match registry.kind(*inner) {
                    HostKind::Atom(atom) if atom.is_value_type() => PrimitiveRepr::Atom(*atom),
                    HostKind::Enum(decl) => {
                        if !self.validate_wrapped_enum(*inner, decl) {
                            return None;
                        }
                        PrimitiveRepr::Enum(*inner)
                    }
                    _ => {
                        let detail = format!("`{}`", registry.display(*inner));
                        self.error(DiagnosticKind::UnsupportedNullable, ty, Some(detail));
                        return None;
                    }
                };
                Some(DataType::Primitive(PrimitiveType {
                    host: ty,
                    repr,
                    nullable: true,
                }))
            }
            HostKind::Array(element) | HostKind::List(element) => {
                let fixed_size = matches!(host.kind, HostKind::Array(_));
                let element = self.visit(*element)?;
                Some(DataType::Array(ArrayType {
                    host: ty,
                    element,
                    fixed_size,
                }))
            }
            HostKind::Tuple(items) => {
                let names = (1..=items.len()).map(|i| format!("Item{i}"));
                let members: Vec<_> = names.zip(items.iter().copied()).collect();
                self.positional(ty, StructuralKind::Tuple, &members, |_| false)
            }
            HostKind::Anonymous(fields) => {
                let members: Vec<_> = fields.iter().map(|f| (f.name.clone(), f.ty)).collect();
                self.positional(ty, StructuralKind::Anonymous, &members, |_| false)
            }
            HostKind::Record(fields) => {
                let members: Vec<_> = fields.iter().map(|f| (f.name.clone(), f.ty)).collect();
                self.positional(ty, StructuralKind::Record, &members, |slot| {
                    fields[slot].writable
                })
            }
            HostKind::Class(decl) => {
                if !decl.is_mapped() && !host.known_type {
                    let detail = registry.display(ty);
                    self.error(DiagnosticKind::UnmappedType, ty, Some(detail));
                    return None;
                }
                self.validate_entity(ty, decl).map(DataType::Structural)
            }
            HostKind::Function { parameters, result } => {
                let parameters = self.visit_all(parameters);
                let result = self.visit(*result);
                Some(DataType::Function(FunctionType {
                    host: ty,
                    parameters: parameters?,
                    result: result?,
                }))
            }
            HostKind::Expression => Some(DataType::Expression(ExpressionType { host: ty })),
            HostKind::Quoted(inner) => {
                if !matches!(registry.kind(*inner), HostKind::Function { .. }) {
                    let detail = format!("`{}`", registry.display(ty));
                    self.error(DiagnosticKind::UnsupportedQuotation, ty, Some(detail));
                    return None;
                }
                let function = self.visit(*inner)?;
                Some(DataType::Quotation(QuotationType { host: ty, function }))
            }
            HostKind::GenericParameter { wildcard: true } => {
                Some(DataType::OpenParameter(OpenParameterType { host: ty }))
            }
            HostKind::Custom => Some(DataType::Custom(CustomType { host: ty })),
            HostKind::Declared => {
                let detail = registry.display(ty);
                self.error(DiagnosticKind::UndefinedType, ty, Some(detail));
                None
            }
            HostKind::GenericParameter { wildcard: false } => {
                self.unsupported(DiagnosticKind::UnsupportedTypeParameter, ty)
            }
            HostKind::Sequence(_) => self.unsupported(DiagnosticKind::UnsupportedSequence, ty),
            HostKind::MultiArray { .. } => {
                self.unsupported(DiagnosticKind::UnsupportedMultiDimensionalArray, ty)
            }
            HostKind::Pointer(_) => self.unsupported(DiagnosticKind::UnsupportedPointer, ty),
            HostKind::ByRef(_) => self.unsupported(DiagnosticKind::UnsupportedByRef, ty),
            HostKind::GenericDefinition { .. } => {
                self.unsupported(DiagnosticKind::UnsupportedOpenGeneric, ty)
            }
            HostKind::Dynamic => self.unsupported(DiagnosticKind::UnsupportedDynamic, ty),
            HostKind::Handle => self.unsupported(DiagnosticKind::UnsupportedHandle, ty),
        }
        .inspect(|node| trace!("{id} = {:?} for `{}`", node.kind(), registry.display(ty)))
    }

    /// Structural node whose properties are positional members.
    fn positional(
        &mut self,
        ty: HostTypeId,
        kind: StructuralKind,
        members: &[(String, HostTypeId)],
        writable: impl Fn(usize) -> bool,
    ) -> Option<DataType> {
        let mut properties = Vec::with_capacity(members.len());
        let mut ok = true;
        for (slot, (name, member_ty)) in members.iter().enumerate() {
            let Some(child) = self.visit(*member_ty) else {
                ok = false;
                continue;
            };
            properties.push(Property {
                name: name.clone(),
                ty: child,
                member: MemberBinding {
                    owner: ty,
                    name: name.clone(),
                    slot,
                    writable: writable(slot),
                },
            });
        }
        ok.then(|| {
            DataType::Structural(StructuralType {
                host: ty,
                kind,
                properties,
                construction: Construction::Positional,
            })
        })
    }

    /// Visit every type, even after a failure, so independent errors are
    /// all collected.
    pub(super) fn visit_all(&mut self, types: &[HostTypeId]) -> Option<Vec<NodeId>> {
        let ids: Vec<_> = types.iter().map(|ty| self.visit(*ty)).collect();
        ids.into_iter().collect()
    }

    fn unsupported(&mut self, kind: DiagnosticKind, ty: HostTypeId) -> Option<DataType> {
        let detail = format!("`{}`", self.registry.display(ty));
        self.error(kind, ty, Some(detail));
        None
    }

    /// Report an error at `ty`, the innermost type on the active path.
    pub(super) fn error(&mut self, kind: DiagnosticKind, ty: HostTypeId, detail: Option<String>) {
        let stack = self.stack(None);
        let registry = self.registry;
        let mut builder = self.report.report(kind, ty, registry).stack(stack);
        if let Some(detail) = detail {
            builder = builder.message(detail);
        }
        builder.emit();
    }

    /// Validate the enumeration under a nullable wrapper. The wrapper's node
    /// carries the enumeration, so no node is created for it.
    fn validate_wrapped_enum(&mut self, ty: HostTypeId, decl: &EnumDecl) -> bool {
        if self.finished.contains_key(&ty) {
            return true;
        }
        if self.failed.contains(&ty) {
            return false;
        }
        let valid = self.validate_enum(ty, decl);
        if !valid {
            self.failed.insert(ty);
        }
        valid
    }

    fn report_cycle(&mut self, ty: HostTypeId) {
        let path: Vec<String> = self
            .active
            .keys()
            .skip_while(|t| **t != ty)
            .chain(std::iter::once(&ty))
            .map(|t| format!("`{}`", self.registry.display(*t)))
            .collect();
        let detail = path.join(" -> ");
        let stack = self.stack(Some(ty));
        let registry = self.registry;
        self.report
            .report(DiagnosticKind::CycleDetected, ty, registry)
            .message(detail)
            .stack(stack)
            .emit();
    }

    /// Offending type first, then the active path innermost to outermost.
    fn stack(&self, offending: Option<HostTypeId>) -> Vec<StackFrame> {
        offending
            .into_iter()
            .chain(self.active.keys().rev().copied())
            .map(|ty| StackFrame {
                ty,
                name: self.registry.display(ty),
            })
            .collect()
    }
}
