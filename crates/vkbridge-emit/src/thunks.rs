//! Bridging header and thunk source rendering.
//!
//! The bridging header declares host-layout struct variants and the
//! per-scope dispatch tables; the thunk source defines the conversion and
//! free helpers plus one thunk per generated function. Conversion code is
//! compiled only on the 32-bit targets where the layouts actually differ;
//! 64-bit builds call straight through.

use std::collections::HashSet;

use vkbridge_registry::entity::{EntityKind, LengthSource, Member, TypeRef};
use vkbridge_registry::{Catalog, EntityId, GeneratorConfig, RawExtensionKind};

use vkbridge_abi::classify::INSTANCE_SCOPE_HANDLES;
use vkbridge_abi::{
    conversion_copies_chain_only, member_copy_kind, param_direction, param_needs_conversion,
    Arrayness, BridgeModel, ConversionDirection, ConversionFunction, CopyKind, FreeFunction,
    FunctionBinding, LayoutAnalyzer, SynthesizedOp,
};

use crate::decl::{member_decl, pfn, prototype};
use crate::error::{EmitError, Result};

/// Prefix of generated (and hand-written) bridge entry points.
pub const THUNK_PREFIX: &str = "bridge_";

/// Allocation-callback parameters are suppressed at the boundary until
/// cross-convention callbacks are bridged.
const ALLOCATOR_TYPE: &str = "VkAllocationCallbacks";

// --- Bridging header ---

/// Render the bridging header (host structs, dispatch tables).
pub fn render_bridge_header(
    catalog: &Catalog,
    model: &BridgeModel,
    layout: &mut LayoutAnalyzer,
) -> Result<String> {
    let conv: HashSet<EntityId> = model.conversion_structs.iter().copied().collect();

    let mut out = String::new();
    out.push_str("/* Automatically generated from the API registry; do not edit. */\n\n");
    out.push_str("#ifndef __VKBRIDGE_THUNKS_H\n#define __VKBRIDGE_THUNKS_H\n\n");

    out.push_str("/* Perform struct conversion on 32-bit targets, where the\n");
    out.push_str(" * foreign and host structure layouts can disagree. */\n");
    out.push_str("#if (defined(__i386__) || defined(__arm__))\n");
    out.push_str("    #define USE_STRUCT_CONVERSION\n");
    out.push_str("#endif\n\n");

    out.push_str("void *bridge_get_device_proc_addr(const char *name);\n");
    out.push_str("void *bridge_get_instance_proc_addr(const char *name);\n\n");
    out.push_str("int bridge_device_extension_supported(const char *name);\n");
    out.push_str("int bridge_instance_extension_supported(const char *name);\n\n");

    out.push_str("/* Functions with custom implementations outside of the thunks. */\n");
    for binding in non_global(model) {
        if binding.overrides.thunk {
            continue;
        }
        let func = catalog.get(binding.id).as_function().expect("function");
        let proto = prototype(
            catalog,
            layout,
            &binding.name,
            func,
            Some("VKAPI_CALL"),
            THUNK_PREFIX,
        )?;
        out.push_str(&format!("{proto};\n"));
    }
    out.push('\n');

    // Host-layout variants of converting structures, in dependency order.
    for &id in &model.conversion_structs {
        let entity = catalog.get(id);
        let s = entity.as_struct().expect("conversion struct");
        let keyword = if s.is_union { "union" } else { "struct" };
        out.push_str(&format!("typedef {keyword} {}_host\n{{\n", entity.name));
        for member in &s.members {
            let decl = member_decl(catalog, layout, &entity.name, member, false, Some(&conv))?;
            out.push_str(&format!("    {decl};\n"));
        }
        out.push_str(&format!("}} {}_host;\n\n", entity.name));
    }

    out.push_str("/* For use by the device handle and children. */\n");
    out.push_str("struct vulkan_device_funcs\n{\n");
    render_dispatch_pfns(catalog, &model.functions.device, &conv, &mut out);
    out.push_str("};\n\n");

    out.push_str("/* For use by the instance handle and children. */\n");
    out.push_str("struct vulkan_instance_funcs\n{\n");
    render_dispatch_pfns(catalog, &model.functions.instance, &conv, &mut out);
    out.push_str("};\n\n");

    render_funcs_macro(&model.functions.device, "ALL_VK_DEVICE_FUNCS", &mut out);
    render_funcs_macro(&model.functions.instance, "ALL_VK_INSTANCE_FUNCS", &mut out);

    out.push_str("#endif /* __VKBRIDGE_THUNKS_H */\n");
    Ok(out)
}

fn non_global(model: &BridgeModel) -> impl Iterator<Item = &FunctionBinding> {
    model
        .functions
        .instance
        .iter()
        .chain(model.functions.device.iter())
}

fn in_dispatch_table(binding: &FunctionBinding) -> bool {
    binding.overrides.dispatch && !binding.overrides.driver
}

fn render_dispatch_pfns(
    catalog: &Catalog,
    bindings: &[FunctionBinding],
    conv: &HashSet<EntityId>,
    out: &mut String,
) {
    for binding in bindings {
        if !in_dispatch_table(binding) {
            tracing::debug!(function = %binding.name, "skipping in dispatch table struct");
            continue;
        }
        let func = catalog.get(binding.id).as_function().expect("function");
        if binding.needs_conversion {
            out.push_str("#if defined(USE_STRUCT_CONVERSION)\n");
            out.push_str(&format!("    {};\n", pfn(&binding.name, func, Some(conv))));
            out.push_str("#else\n");
            out.push_str(&format!("    {};\n", pfn(&binding.name, func, None)));
            out.push_str("#endif\n");
        } else {
            out.push_str(&format!("    {};\n", pfn(&binding.name, func, None)));
        }
    }
}

fn render_funcs_macro(bindings: &[FunctionBinding], macro_name: &str, out: &mut String) {
    out.push_str(&format!("#define {macro_name}() \\\n"));
    let mut first = true;
    for binding in bindings {
        if !in_dispatch_table(binding) {
            continue;
        }
        if first {
            out.push_str(&format!("    USE_VK_FUNC({})", binding.name));
            first = false;
        } else {
            out.push_str(&format!(" \\\n    USE_VK_FUNC({})", binding.name));
        }
    }
    out.push_str("\n\n");
}

// --- Thunk source ---

/// Render the thunk source file.
pub fn render_thunk_source(
    catalog: &Catalog,
    model: &BridgeModel,
    layout: &mut LayoutAnalyzer,
    config: &GeneratorConfig,
) -> Result<String> {
    let mut out = String::new();
    out.push_str("/* Automatically generated from the API registry; do not edit. */\n\n");
    out.push_str("#include <stdlib.h>\n#include <string.h>\n\n");
    out.push_str("#include \"vulkan.h\"\n");
    out.push_str("#include \"vulkan_driver.h\"\n");
    out.push_str("#include \"vulkan_thunks.h\"\n");
    out.push_str("#include \"vulkan_private.h\"\n\n");

    out.push_str("#if defined(USE_STRUCT_CONVERSION)\n");
    for op in &model.operations {
        match op {
            SynthesizedOp::Convert(c) => {
                out.push_str(&render_conversion(catalog, layout, c)?);
            }
            SynthesizedOp::Free(f) => {
                out.push_str(&render_free(catalog, layout, f)?);
            }
        }
    }
    out.push_str("#endif /* USE_STRUCT_CONVERSION */\n\n");

    for binding in non_global(model) {
        if !binding.overrides.thunk {
            continue;
        }
        out.push_str(&render_thunk(catalog, layout, config, binding)?);
    }

    render_dispatch_array(&model.functions.device, "vk_device_dispatch_table", &mut out);
    render_dispatch_array(
        &model.functions.instance,
        "vk_instance_dispatch_table",
        &mut out,
    );

    render_proc_addr(
        "bridge_get_device_proc_addr",
        "vk_device_dispatch_table",
        &mut out,
    );
    render_proc_addr(
        "bridge_get_instance_proc_addr",
        "vk_instance_dispatch_table",
        &mut out,
    );

    render_extension_array(model, RawExtensionKind::Device, "vk_device_extensions", &mut out);
    render_extension_array(
        model,
        RawExtensionKind::Instance,
        "vk_instance_extensions",
        &mut out,
    );
    render_extension_query(
        "bridge_device_extension_supported",
        "vk_device_extensions",
        &mut out,
    );
    render_extension_query(
        "bridge_instance_extension_supported",
        "vk_instance_extensions",
        &mut out,
    );

    Ok(out)
}

/// Count expression for a dynamic member inside a conversion body.
fn member_count_expr(member: &Member, in_prefix: &str) -> String {
    match member.dyn_len.as_ref() {
        Some(LengthSource::Member(name)) => format!("{in_prefix}{name}"),
        Some(LengthSource::Literal(n)) => n.to_string(),
        None => "1".to_string(),
    }
}

/// One copy statement inside a conversion body.
fn copy_statement(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    member: &Member,
    in_prefix: &str,
    out_prefix: &str,
    direction: ConversionDirection,
) -> Result<String> {
    let kind = member_copy_kind(catalog, layout, member)?;
    let name = &member.name;
    Ok(match kind {
        CopyKind::Assign => format!("{out_prefix}{name} = {in_prefix}{name};\n"),
        CopyKind::RawArrayCopy => {
            let len = member.fixed_len.as_ref().expect("fixed array");
            format!(
                "memcpy({out_prefix}{name}, {in_prefix}{name}, {len} * sizeof({}));\n",
                member.type_name
            )
        }
        CopyKind::ConvertScalar => {
            let ty = member_struct_id(member).expect("converting member");
            let callee = vkbridge_abi::convert::conversion_name(
                catalog,
                direction,
                Arrayness::Scalar,
                ty,
            );
            format!("{callee}(&{in_prefix}{name}, &{out_prefix}{name});\n")
        }
        CopyKind::ConvertFixedArray => {
            let ty = member_struct_id(member).expect("converting member");
            let callee = vkbridge_abi::convert::conversion_name(
                catalog,
                direction,
                Arrayness::FixedArray,
                ty,
            );
            let len = member.fixed_len.as_ref().expect("fixed array");
            format!("{callee}({in_prefix}{name}, {out_prefix}{name}, {len});\n")
        }
        CopyKind::ConvertDynamicArray => {
            let ty = member_struct_id(member).expect("converting member");
            let callee = vkbridge_abi::convert::conversion_name(
                catalog,
                direction,
                Arrayness::DynamicArray,
                ty,
            );
            let count = member_count_expr(member, in_prefix);
            format!("{out_prefix}{name} = {callee}({in_prefix}{name}, {count});\n")
        }
    })
}

fn member_struct_id(member: &Member) -> Option<EntityId> {
    match member.ty {
        TypeRef::Entity(id) => Some(id),
        TypeRef::Scalar(_) => None,
    }
}

fn render_conversion(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    c: &ConversionFunction,
) -> Result<String> {
    let t = catalog.name(c.ty);
    let s = catalog.get(c.ty).as_struct().expect("conversion struct");
    let (in_ty, out_ty) = match c.direction {
        ConversionDirection::ToHost => (t.to_string(), format!("{t}_host")),
        ConversionDirection::ToForeign => (format!("{t}_host"), t.to_string()),
    };

    let mut body = String::new();
    match c.arrayness {
        Arrayness::Scalar => {
            body.push_str(&format!(
                "static inline void {}(const {in_ty} *in, {out_ty} *out)\n{{\n",
                c.name
            ));
            body.push_str("    if (!in) return;\n\n");
            if conversion_copies_chain_only(catalog, c.direction, c.ty) {
                // The callee fills everything else; only the chain link
                // and the discriminant come from the caller.
                body.push_str("    out->pNext = in->pNext;\n");
                body.push_str("    out->sType = in->sType;\n");
            } else {
                for member in &s.members {
                    let stmt =
                        copy_statement(catalog, layout, member, "in->", "out->", c.direction)?;
                    body.push_str(&format!("    {stmt}"));
                }
            }
            body.push_str("}\n\n");
        }
        Arrayness::DynamicArray => {
            body.push_str(&format!(
                "static inline {out_ty} *{}(const {in_ty} *in, uint32_t count)\n{{\n",
                c.name
            ));
            body.push_str(&format!("    {out_ty} *out;\n"));
            body.push_str("    unsigned int i;\n\n");
            body.push_str("    if (!in) return NULL;\n\n");
            body.push_str(&format!(
                "    out = ({out_ty} *)malloc(count * sizeof(*out));\n"
            ));
            body.push_str("    for (i = 0; i < count; i++)\n    {\n");
            for member in &s.members {
                let stmt =
                    copy_statement(catalog, layout, member, "in[i].", "out[i].", c.direction)?;
                body.push_str(&format!("        {stmt}"));
            }
            body.push_str("    }\n\n    return out;\n}\n\n");
        }
        Arrayness::FixedArray => {
            body.push_str(&format!(
                "static inline void {}(const {in_ty} *in, {out_ty} *out, uint32_t count)\n{{\n",
                c.name
            ));
            body.push_str("    unsigned int i;\n\n");
            body.push_str("    if (!in) return;\n\n");
            body.push_str("    for (i = 0; i < count; i++)\n    {\n");
            for member in &s.members {
                let stmt =
                    copy_statement(catalog, layout, member, "in[i].", "out[i].", c.direction)?;
                body.push_str(&format!("        {stmt}"));
            }
            body.push_str("    }\n}\n\n");
        }
    }
    Ok(body)
}

fn render_free(catalog: &Catalog, layout: &mut LayoutAnalyzer, f: &FreeFunction) -> Result<String> {
    let t = catalog.name(f.ty);
    let s = catalog.get(f.ty).as_struct().expect("free struct");
    let needs_free = layout.struct_needs_free(catalog, f.ty)?;

    let mut body = String::new();
    if f.dyn_array {
        body.push_str(&format!(
            "static inline void {}({t}_host *in, uint32_t count)\n{{\n",
            f.name
        ));
        if needs_free {
            body.push_str("    unsigned int i;\n\n");
            body.push_str("    if (!in) return;\n\n");
            body.push_str("    for (i = 0; i < count; i++)\n    {\n");
            for member in &s.members {
                body.push_str(&member_free_statement(
                    catalog, layout, member, "in[i].", "        ",
                )?);
            }
            body.push_str("    }\n");
        } else {
            body.push_str("    if (!in) return;\n\n");
        }
        body.push_str("    free(in);\n}\n\n");
    } else {
        // A scalar free only exists for structs owning converted dynamic
        // arrays; the struct itself lives on the caller's stack.
        if !needs_free {
            return Ok(String::new());
        }
        body.push_str(&format!("static inline void {}({t}_host *in)\n{{\n", f.name));
        for member in &s.members {
            body.push_str(&member_free_statement(catalog, layout, member, "in->", "    ")?);
        }
        body.push_str("}\n\n");
    }
    Ok(body)
}

fn member_free_statement(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    member: &Member,
    in_prefix: &str,
    indent: &str,
) -> Result<String> {
    if !(member.is_dynamic_array() && layout.member_needs_conversion(catalog, member)?) {
        return Ok(String::new());
    }
    let ty = member_struct_id(member).expect("converting member");
    let t = catalog.name(ty);
    let count = member_count_expr(member, in_prefix);
    if member.is_const {
        // Cast away the const we put on buffers we allocated ourselves.
        Ok(format!(
            "{indent}free_{t}_array(({t}_host *){in_prefix}{}, {count});\n",
            member.name
        ))
    } else {
        Ok(format!(
            "{indent}free_{t}_array({in_prefix}{}, {count});\n",
            member.name
        ))
    }
}

/// Dispatch-table access path for a dispatchable handle.
fn dispatch_table_path(catalog: &Catalog, handle_id: EntityId) -> Result<String> {
    let entity = catalog.get(handle_id);
    let handle = entity
        .as_handle()
        .filter(|h| h.dispatchable)
        .ok_or_else(|| EmitError::UnhandledDispatchAccess {
            handle: entity.name.clone(),
        })?;

    // The top-level handle and the device handle own their tables;
    // children reach through their owning scope object.
    let parent = match handle.parent {
        None => return Ok("funcs".to_string()),
        Some(p) => p,
    };
    if entity.name == "VkDevice" {
        return Ok("funcs".to_string());
    }
    if INSTANCE_SCOPE_HANDLES.contains(&catalog.name(parent)) {
        return Ok("instance->funcs".to_string());
    }
    Ok("device->funcs".to_string())
}

/// Field giving access to the wrapped native object of a dispatchable
/// handle.
fn native_handle_field(name: &str) -> String {
    match name {
        "VkCommandBuffer" => "command_buffer".to_string(),
        "VkDevice" => "device".to_string(),
        "VkInstance" => "instance".to_string(),
        "VkPhysicalDevice" => "phys_dev".to_string(),
        "VkQueue" => "queue".to_string(),
        other => {
            // Fallback: snake-case the bare name.
            let bare = other.strip_prefix("Vk").unwrap_or(other);
            let mut out = String::new();
            for (i, ch) in bare.chars().enumerate() {
                if ch.is_ascii_uppercase() && i > 0 {
                    out.push('_');
                }
                out.push(ch.to_ascii_lowercase());
            }
            out
        }
    }
}

/// Argument expression for one parameter of a thunk call.
fn call_argument(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    config: &GeneratorConfig,
    param: &Member,
    conv: bool,
) -> Result<String> {
    // Allocation callbacks cross calling conventions; suppressed until
    // callback bridging exists.
    if param.type_name.contains(ALLOCATOR_TYPE) {
        return Ok("NULL".to_string());
    }

    if let TypeRef::Entity(id) = param.ty {
        if let EntityKind::Handle(h) = &catalog.get(id).kind {
            if h.dispatchable {
                return Ok(format!(
                    "{}->{}",
                    param.name,
                    native_handle_field(&param.type_name)
                ));
            }
        }
    }

    if conv && param_needs_conversion(catalog, layout, config, param)? {
        if param.is_dynamic_array() {
            return Ok(format!("{}_host", param.name));
        }
        return Ok(format!("&{}_host", param.name));
    }
    Ok(param.name.clone())
}

/// Count expression for a dynamic parameter at thunk scope.
fn param_count_expr(param: &Member, deref: bool) -> String {
    match param.dyn_len.as_ref() {
        Some(LengthSource::Member(name)) => {
            if deref {
                format!("*{name}")
            } else {
                name.clone()
            }
        }
        Some(LengthSource::Literal(n)) => n.to_string(),
        None => "1".to_string(),
    }
}

fn render_thunk(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    config: &GeneratorConfig,
    binding: &FunctionBinding,
) -> Result<String> {
    let func = catalog.get(binding.id).as_function().expect("function");
    let proto = prototype(
        catalog,
        layout,
        &binding.name,
        func,
        Some("VKAPI_CALL"),
        THUNK_PREFIX,
    )?;

    let mut out = format!("static {proto}\n{{\n");
    if binding.needs_conversion {
        out.push_str("#if defined(USE_STRUCT_CONVERSION)\n");
        out.push_str(&render_conversion_body(catalog, layout, config, binding)?);
        out.push_str("#else\n");
        out.push_str(&render_plain_body(catalog, layout, config, binding)?);
        out.push_str("#endif\n");
    } else {
        out.push_str(&render_plain_body(catalog, layout, config, binding)?);
    }
    out.push_str("}\n\n");
    Ok(out)
}

fn render_call(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    config: &GeneratorConfig,
    binding: &FunctionBinding,
    conv: bool,
    assign: &str,
) -> Result<String> {
    let func = catalog.get(binding.id).as_function().expect("function");
    let first = func.params.first().expect("non-global function");
    let handle_id = match first.ty {
        TypeRef::Entity(id) => id,
        TypeRef::Scalar(_) => {
            return Err(EmitError::UnhandledDispatchAccess {
                handle: first.type_name.clone(),
            })
        }
    };
    let table = dispatch_table_path(catalog, handle_id)?;

    let args: Result<Vec<String>> = func
        .params
        .iter()
        .map(|p| call_argument(catalog, layout, config, p, conv))
        .collect();
    Ok(format!(
        "    {assign}{}->{table}.p_{}({});\n",
        first.name,
        binding.name,
        args?.join(", ")
    ))
}

fn render_plain_body(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    config: &GeneratorConfig,
    binding: &FunctionBinding,
) -> Result<String> {
    let func = catalog.get(binding.id).as_function().expect("function");
    let assign = if func.returns_void() { "" } else { "return " };
    render_call(catalog, layout, config, binding, false, assign)
}

fn render_conversion_body(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    config: &GeneratorConfig,
    binding: &FunctionBinding,
) -> Result<String> {
    let func = catalog.get(binding.id).as_function().expect("function");
    let mut out = String::new();

    if !func.returns_void() {
        out.push_str(&format!("    {} result;\n", func.return_type_name));
    }

    // Host-layout temporaries for converting parameters.
    let mut converting: Vec<(&Member, vkbridge_abi::Direction)> = Vec::new();
    for param in &func.params {
        if param_needs_conversion(catalog, layout, config, param)? {
            converting.push((param, param_direction(catalog, param)?));
        }
    }
    for (param, _) in &converting {
        if param.is_dynamic_array() {
            out.push_str(&format!("    {}_host *{}_host;\n", param.type_name, param.name));
        } else {
            out.push_str(&format!("    {}_host {}_host;\n", param.type_name, param.name));
        }
    }
    out.push('\n');

    // Convert inputs to the host layout.
    for (param, direction) in &converting {
        if !direction.is_input() {
            continue;
        }
        let ty = member_struct_id(param).expect("converting parameter");
        if param.is_dynamic_array() {
            let callee = vkbridge_abi::convert::conversion_name(
                catalog,
                ConversionDirection::ToHost,
                Arrayness::DynamicArray,
                ty,
            );
            let count = param_count_expr(param, false);
            out.push_str(&format!(
                "    {}_host = {callee}({}, {count});\n",
                param.name, param.name
            ));
        } else {
            let callee = vkbridge_abi::convert::conversion_name(
                catalog,
                ConversionDirection::ToHost,
                Arrayness::Scalar,
                ty,
            );
            out.push_str(&format!(
                "    {callee}({}, &{}_host);\n",
                param.name, param.name
            ));
        }
    }

    let assign = if func.returns_void() { "" } else { "result = " };
    out.push_str(&render_call(catalog, layout, config, binding, true, assign)?);
    out.push('\n');

    // Convert outputs back to the foreign layout.
    for (param, direction) in &converting {
        if !direction.is_output() {
            continue;
        }
        let ty = member_struct_id(param).expect("converting parameter");
        let callee = vkbridge_abi::convert::conversion_name(
            catalog,
            ConversionDirection::ToForeign,
            Arrayness::Scalar,
            ty,
        );
        out.push_str(&format!(
            "    {callee}(&{}_host, {});\n",
            param.name, param.name
        ));
    }

    // Release conversion buffers.
    for (param, _) in &converting {
        let ty = member_struct_id(param).expect("converting parameter");
        let s = catalog.get(ty).as_struct().expect("struct parameter");
        if param.is_dynamic_array() {
            let count = param_count_expr(param, s.returned_only);
            out.push_str(&format!(
                "    free_{}_array({}_host, {count});\n",
                catalog.name(ty),
                param.name
            ));
        } else if layout.struct_needs_free(catalog, ty)? {
            out.push_str(&format!(
                "    free_{}(&{}_host);\n",
                catalog.name(ty),
                param.name
            ));
        }
    }

    if !func.returns_void() {
        out.push_str("    return result;\n");
    }
    Ok(out)
}

fn render_dispatch_array(bindings: &[FunctionBinding], table: &str, out: &mut String) {
    out.push_str(&format!("static const struct vulkan_func {table}[] =\n{{\n"));
    for binding in bindings {
        if !binding.overrides.dispatch {
            tracing::debug!(function = %binding.name, "skipping in dispatch table");
            continue;
        }
        out.push_str(&format!(
            "    {{\"{0}\", &{THUNK_PREFIX}{0}}},\n",
            binding.name
        ));
    }
    out.push_str("};\n\n");
}

fn render_proc_addr(func_name: &str, table: &str, out: &mut String) {
    out.push_str(&format!("void *{func_name}(const char *name)\n{{\n"));
    out.push_str("    unsigned int i;\n");
    out.push_str(&format!(
        "    for (i = 0; i < ARRAY_SIZE({table}); i++)\n    {{\n"
    ));
    out.push_str(&format!(
        "        if (strcmp({table}[i].name, name) == 0)\n"
    ));
    out.push_str(&format!("            return {table}[i].func;\n"));
    out.push_str("    }\n    return NULL;\n}\n\n");
}

fn render_extension_array(
    model: &BridgeModel,
    kind: RawExtensionKind,
    array: &str,
    out: &mut String,
) {
    out.push_str(&format!("static const char *{array}[] =\n{{\n"));
    for ext in &model.extensions {
        if ext.kind != kind {
            continue;
        }
        out.push_str(&format!("    \"{}\",\n", ext.name));
    }
    out.push_str("};\n\n");
}

fn render_extension_query(func_name: &str, array: &str, out: &mut String) {
    out.push_str(&format!("int {func_name}(const char *name)\n{{\n"));
    out.push_str("    unsigned int i;\n");
    out.push_str(&format!(
        "    for (i = 0; i < ARRAY_SIZE({array}); i++)\n    {{\n"
    ));
    out.push_str(&format!("        if (strcmp({array}[i], name) == 0)\n"));
    out.push_str("            return 1;\n");
    out.push_str("    }\n    return 0;\n}\n\n");
}
