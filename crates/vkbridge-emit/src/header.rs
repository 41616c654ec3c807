//! Public API header rendering (foreign layout).
//!
//! Declaration strategy: constants and simple typedefs first, then enums
//! and function pointers, then structures in dependency order, then the
//! API prototypes, so nothing ever forward-references.

use vkbridge_registry::entity::EntityKind;
use vkbridge_registry::Catalog;

use vkbridge_abi::{BridgeModel, LayoutAnalyzer};
use vkbridge_resolve::RequiredSet;

use crate::decl::{member_decl, prototype};
use crate::error::Result;

/// Render the public API header.
pub fn render_api_header(
    catalog: &Catalog,
    model: &BridgeModel,
    required: &RequiredSet,
    layout: &mut LayoutAnalyzer,
) -> Result<String> {
    let mut out = String::new();
    out.push_str("/* Automatically generated from the API registry; do not edit. */\n\n");
    out.push_str("#ifndef __VKBRIDGE_API_H\n#define __VKBRIDGE_API_H\n\n");
    out.push_str("#include <stdint.h>\n\n");

    out.push_str("#ifndef VKAPI_CALL\n#define VKAPI_CALL __stdcall\n#endif\n\n");
    out.push_str("#ifndef VKAPI_PTR\n#define VKAPI_PTR VKAPI_CALL\n#endif\n\n");
    out.push_str("/* Callers can override VKB_ALIGN if they want host-layout headers. */\n");
    out.push_str("#ifndef VKB_ALIGN\n#define VKB_ALIGN(x) DECLSPEC_ALIGN(x)\n#endif\n\n");

    // Constants and defines are cheap and harmless: emit them all rather
    // than chase which structure references which constant.
    for (_, entity) in catalog.iter() {
        if let EntityKind::Constant(c) = &entity.kind {
            out.push_str(&format!("#define {} {}\n", entity.name, c.value));
        }
    }
    out.push('\n');
    for (_, entity) in catalog.iter() {
        if let EntityKind::Define(d) = &entity.kind {
            out.push_str(&d.body);
            out.push('\n');
        }
    }
    out.push('\n');

    for id in catalog.sorted_ids_where(|e| matches!(e.kind, EntityKind::Handle(_))) {
        if !required.contains(id) {
            continue;
        }
        let entity = catalog.get(id);
        let h = entity.as_handle().expect("handle ids");
        if h.dispatchable {
            out.push_str(&format!("VK_DEFINE_HANDLE({})\n", entity.name));
        } else {
            out.push_str(&format!(
                "VK_DEFINE_NON_DISPATCHABLE_HANDLE({})\n",
                entity.name
            ));
        }
    }
    out.push('\n');

    for id in catalog.sorted_ids_where(|e| matches!(e.kind, EntityKind::Base(_))) {
        let entity = catalog.get(id);
        if let EntityKind::Base(b) = &entity.kind {
            out.push_str(&format!("typedef {} {};\n", b.underlying, entity.name));
        }
    }
    out.push('\n');

    for id in catalog.sorted_ids_where(|e| matches!(e.kind, EntityKind::Bitmask(_))) {
        let entity = catalog.get(id);
        if let EntityKind::Bitmask(b) = &entity.kind {
            out.push_str(&format!(
                "typedef {} {};\n",
                b.underlying_name, entity.name
            ));
        }
    }
    out.push('\n');

    for id in catalog.sorted_ids_where(|e| matches!(e.kind, EntityKind::Enum(_))) {
        if !required.contains(id) {
            continue;
        }
        let entity = catalog.get(id);
        let e = entity.as_enum().expect("enum ids");
        out.push_str(&format!("typedef enum {}\n{{\n", entity.name));
        for value in e.sorted_values() {
            out.push_str(&format!("    {value},\n"));
        }
        out.push_str(&format!("}} {};\n\n", entity.name));
    }

    for id in catalog.sorted_ids_where(|e| matches!(e.kind, EntityKind::FuncPointer(_))) {
        if !required.contains(id) {
            continue;
        }
        let entity = catalog.get(id);
        if let EntityKind::FuncPointer(fp) = &entity.kind {
            out.push_str(&format!(
                "typedef {} (VKAPI_PTR *{})(",
                fp.return_type, entity.name
            ));
            if fp.members.is_empty() {
                out.push_str("void");
            } else {
                let members: Result<Vec<String>> = fp
                    .members
                    .iter()
                    .map(|m| member_decl(catalog, layout, &entity.name, m, false, None))
                    .collect();
                out.push_str(&members?.join(", "));
            }
            out.push_str(");\n");
        }
    }
    out.push('\n');

    // Structures and unions, decoupled so substructures come first.
    for &id in &model.required_structs {
        let entity = catalog.get(id);
        let s = entity.as_struct().expect("struct list");
        let keyword = if s.is_union { "union" } else { "struct" };
        out.push_str(&format!("typedef {keyword} {}\n{{\n", entity.name));
        for member in &s.members {
            let decl = member_decl(catalog, layout, &entity.name, member, true, None)?;
            out.push_str(&format!("    {decl};\n"));
        }
        out.push_str(&format!("}} {};\n\n", entity.name));
    }

    for binding in model.functions.all() {
        let func = catalog
            .get(binding.id)
            .as_function()
            .expect("classified function");
        let proto = prototype(catalog, layout, &binding.name, func, Some("VKAPI_CALL"), "")?;
        out.push_str(&format!("{proto};\n"));
    }
    out.push('\n');

    out.push_str("#endif /* __VKBRIDGE_API_H */\n");
    Ok(out)
}
