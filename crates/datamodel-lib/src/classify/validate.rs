//! Declaration validation for entity classes and mapped enumerations.

use std::collections::HashSet;

use datamodel_core::{ClassDecl, ConstructorDecl, EnumDecl, HostTypeId, Mapping};

use crate::diagnostics::DiagnosticKind;
use crate::types::{Construction, MemberBinding, Property, StructuralKind, StructuralType};

use super::builder::GraphBuilder;

impl GraphBuilder<'_> {
    /// Validate a class that opted into entity classification. Every member
    /// and constructor problem is reported before giving up.
    pub(super) fn validate_entity(
        &mut self,
        ty: HostTypeId,
        decl: &ClassDecl,
    ) -> Option<StructuralType> {
        let type_name = self.registry.display(ty);
        let mut ok = true;
        let mut seen = HashSet::new();
        let mut properties = Vec::with_capacity(decl.members.len());

        for (slot, member) in decl.members.iter().enumerate() {
            let what = format!("member `{}` on `{type_name}`", member.name);
            let name = self.mapping_name(ty, member.mapping.as_ref(), &what, &mut seen);
            if !member.readable {
                self.error(DiagnosticKind::WriteOnlyMember, ty, Some(what));
                ok = false;
            }
            let child = self.visit(member.ty);
            match (name, child) {
                (Some(name), Some(child)) if ok => properties.push(Property {
                    name: name.to_owned(),
                    ty: child,
                    member: MemberBinding {
                        owner: ty,
                        name: member.name.clone(),
                        slot,
                        writable: member.writable,
                    },
                }),
                _ => ok = false,
            }
        }

        let construction = self.construction(ty, decl, &type_name)?;
        ok.then(|| StructuralType {
            host: ty,
            kind: StructuralKind::Entity,
            properties,
            construction,
        })
    }

    /// Enumerations with any mapped value must map every value uniquely.
    pub(super) fn validate_enum(&mut self, ty: HostTypeId, decl: &EnumDecl) -> bool {
        if !decl.is_mapped() {
            return true;
        }
        let type_name = self.registry.display(ty);
        let mut ok = true;
        let mut seen = HashSet::new();
        for member in &decl.members {
            let what = format!("value `{}` on `{type_name}`", member.name);
            ok &= self
                .mapping_name(ty, member.mapping.as_ref(), &what, &mut seen)
                .is_some();
        }
        ok
    }

    /// Checks one mapping declaration, recording its name in `seen`.
    fn mapping_name<'m>(
        &mut self,
        ty: HostTypeId,
        mapping: Option<&'m Mapping>,
        what: &str,
        seen: &mut HashSet<&'m str>,
    ) -> Option<&'m str> {
        let Some(mapping) = mapping else {
            self.error(DiagnosticKind::MissingMapping, ty, Some(what.to_owned()));
            return None;
        };
        let Some(name) = mapping.valid_name() else {
            self.error(DiagnosticKind::BlankMapping, ty, Some(what.to_owned()));
            return None;
        };
        if !seen.insert(name) {
            self.error(DiagnosticKind::DuplicateMapping, ty, Some(format!("`{name}`")));
            return None;
        }
        Some(name)
    }

    fn construction(
        &mut self,
        ty: HostTypeId,
        decl: &ClassDecl,
        type_name: &str,
    ) -> Option<Construction> {
        let mapped: Vec<&ConstructorDecl> =
            decl.constructors.iter().filter(|c| c.is_mapped()).collect();
        match mapped.as_slice() {
            [] if decl.default_constructible => Some(Construction::Default),
            [] => {
                self.error(
                    DiagnosticKind::NoConstructor,
                    ty,
                    Some(format!("`{type_name}`")),
                );
                None
            }
            [ctor] => self.correlate(ty, decl, ctor, type_name),
            _ => {
                let detail = format!("{} on `{type_name}`", mapped.len());
                self.error(DiagnosticKind::AmbiguousConstructor, ty, Some(detail));
                None
            }
        }
    }

    /// Match each mapped constructor parameter to the member of the same
    /// mapping name. Read-only members must all be covered.
    fn correlate(
        &mut self,
        ty: HostTypeId,
        decl: &ClassDecl,
        ctor: &ConstructorDecl,
        type_name: &str,
    ) -> Option<Construction> {
        let mut ok = true;
        let mut slots = Vec::with_capacity(ctor.params.len());
        let mut covered = HashSet::new();

        for param in &ctor.params {
            let what = format!("parameter `{}` of `{type_name}` constructor", param.name);
            let Some(mapping) = &param.mapping else {
                self.error(DiagnosticKind::MissingMapping, ty, Some(what));
                ok = false;
                continue;
            };
            let Some(name) = mapping.valid_name() else {
                self.error(DiagnosticKind::BlankMapping, ty, Some(what));
                ok = false;
                continue;
            };
            let member = decl.members.iter().position(|m| {
                m.mapping
                    .as_ref()
                    .and_then(Mapping::valid_name)
                    .is_some_and(|n| n == name)
            });
            let Some(slot) = member else {
                let detail = format!("{what} mapped to `{name}`");
                self.error(
                    DiagnosticKind::ConstructorParameterUnmatched,
                    ty,
                    Some(detail),
                );
                ok = false;
                continue;
            };
            covered.insert(slot);
            let member_ty = decl.members[slot].ty;
            if param.ty != member_ty {
                let detail = format!(
                    "`{name}` is `{}` on the parameter and `{}` on the member",
                    self.registry.display(param.ty),
                    self.registry.display(member_ty),
                );
                self.error(DiagnosticKind::ConstructorTypeMismatch, ty, Some(detail));
                ok = false;
                continue;
            }
            slots.push(slot);
        }

        for (slot, member) in decl.members.iter().enumerate() {
            if member.writable || covered.contains(&slot) {
                continue;
            }
            // Members without a usable mapping were already reported.
            let Some(name) = member.mapping.as_ref().and_then(Mapping::valid_name) else {
                continue;
            };
            let detail = format!("member `{}` mapped to `{name}`", member.name);
            self.error(DiagnosticKind::ConstructorMemberUnmatched, ty, Some(detail));
            ok = false;
        }

        ok.then_some(Construction::Constructor(slots))
    }
}
