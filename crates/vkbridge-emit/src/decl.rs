//! C declaration text for members, parameters and prototypes.

use std::collections::HashSet;

use vkbridge_registry::entity::{Function, Member, TypeRef};
use vkbridge_registry::{Catalog, EntityId};

use vkbridge_abi::LayoutAnalyzer;

use crate::error::Result;

/// Alignment markup macro applied to members that need 8-byte alignment on
/// the foreign target.
pub const ALIGN_MACRO: &str = "VKB_ALIGN(8)";

/// Type spelling for a member, switching converting struct types to their
/// `_host` variant when a conversion set is given.
fn type_spelling(member: &Member, conv: Option<&HashSet<EntityId>>) -> String {
    if let (Some(set), TypeRef::Entity(id)) = (conv, member.ty) {
        if set.contains(&id) {
            return format!("{}_host", member.type_name);
        }
    }
    member.type_name.clone()
}

/// Render one member declaration.
///
/// `align` enables the alignment markup (foreign-layout headers only);
/// `conv` switches nested converting structs to their host variants
/// (bridging header only). The two are never both set.
pub fn member_decl(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    owner: &str,
    member: &Member,
    align: bool,
    conv: Option<&HashSet<EntityId>>,
) -> Result<String> {
    let mut text = String::new();
    if member.is_const {
        text.push_str("const ");
    }
    text.push_str(&type_spelling(member, conv));

    if member.is_pointer() {
        text.push(' ');
        for _ in 0..member.pointer {
            text.push('*');
        }
        text.push_str(&member.name);
    } else {
        if align && layout.member_needs_alignment(catalog, owner, member)? {
            text.push(' ');
            text.push_str(ALIGN_MACRO);
        }
        text.push(' ');
        text.push_str(&member.name);
    }

    if let Some(len) = &member.fixed_len {
        text.push_str(&format!("[{len}]"));
    }
    Ok(text)
}

/// Render a function prototype, e.g.
/// `VkResult VKAPI_CALL bridge_vkFoo(VkDevice device, uint32_t count)`.
pub fn prototype(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    name: &str,
    func: &Function,
    call_conv: Option<&str>,
    prefix: &str,
) -> Result<String> {
    let mut text = func.return_type_name.clone();
    if let Some(cc) = call_conv {
        text.push(' ');
        text.push_str(cc);
    }
    text.push(' ');
    text.push_str(prefix);
    text.push_str(name);
    text.push('(');
    let params: Result<Vec<String>> = func
        .params
        .iter()
        .map(|p| member_decl(catalog, layout, name, p, false, None))
        .collect();
    text.push_str(&params?.join(", "));
    text.push(')');
    Ok(text)
}

/// Render a dispatch-table function pointer, e.g.
/// `VkResult (*p_vkFoo)(VkDevice, const VkInfo_host *)`.
pub fn pfn(
    name: &str,
    func: &Function,
    conv: Option<&HashSet<EntityId>>,
) -> String {
    let mut text = format!("{} (*p_{})(", func.return_type_name, name);
    for (i, param) in func.params.iter().enumerate() {
        if i > 0 {
            text.push_str(", ");
        }
        if param.is_const {
            text.push_str("const ");
        }
        text.push_str(&type_spelling(param, conv));
        if param.is_pointer() {
            text.push(' ');
            for _ in 0..param.pointer {
                text.push('*');
            }
        }
        if let Some(len) = &param.fixed_len {
            text.push_str(&format!("[{len}]"));
        }
    }
    text.push(')');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkbridge_registry::RawRegistry;

    fn catalog() -> Catalog {
        let raw = RawRegistry::parse(
            r#"
[[base-types]]
name = "VkDeviceSize"
underlying = "uint64_t"

[[handles]]
name = "VkDevice"
dispatchable = true

[[structs]]
name = "VkHeap"

[[structs.members]]
name = "size"
type = "VkDeviceSize"

[[structs.members]]
name = "pName"
type = "char"
const = true
pointer = 1

[[structs.members]]
name = "parts"
type = "uint32_t"
array = "4"

[[commands]]
name = "vkGetHeap"
return-type = "void"

[[commands.params]]
name = "device"
type = "VkDevice"

[[commands.params]]
name = "pHeap"
type = "VkHeap"
pointer = 1
"#,
        )
        .unwrap();
        Catalog::build(&raw).unwrap()
    }

    #[test]
    fn member_with_alignment_markup() {
        let c = catalog();
        let mut layout = LayoutAnalyzer::new();
        let s = c.lookup("VkHeap").unwrap().as_struct().unwrap();
        let decl = member_decl(&c, &mut layout, "VkHeap", &s.members[0], true, None).unwrap();
        assert_eq!(decl, "VkDeviceSize VKB_ALIGN(8) size");
        // Without align markup.
        let decl = member_decl(&c, &mut layout, "VkHeap", &s.members[0], false, None).unwrap();
        assert_eq!(decl, "VkDeviceSize size");
    }

    #[test]
    fn pointer_and_array_members() {
        let c = catalog();
        let mut layout = LayoutAnalyzer::new();
        let s = c.lookup("VkHeap").unwrap().as_struct().unwrap();
        let name = member_decl(&c, &mut layout, "VkHeap", &s.members[1], true, None).unwrap();
        assert_eq!(name, "const char *pName");
        let parts = member_decl(&c, &mut layout, "VkHeap", &s.members[2], true, None).unwrap();
        assert_eq!(parts, "uint32_t parts[4]");
    }

    #[test]
    fn host_variant_spelling() {
        let c = catalog();
        let heap = c.id_of("VkHeap").unwrap();
        let conv: HashSet<EntityId> = [heap].into_iter().collect();
        let f = c.lookup("vkGetHeap").unwrap().as_function().unwrap();
        let text = pfn("vkGetHeap", f, Some(&conv));
        assert_eq!(text, "void (*p_vkGetHeap)(VkDevice, VkHeap_host *)");
        let plain = pfn("vkGetHeap", f, None);
        assert_eq!(plain, "void (*p_vkGetHeap)(VkDevice, VkHeap *)");
    }

    #[test]
    fn prototype_rendering() {
        let c = catalog();
        let mut layout = LayoutAnalyzer::new();
        let f = c.lookup("vkGetHeap").unwrap().as_function().unwrap();
        let proto =
            prototype(&c, &mut layout, "vkGetHeap", f, Some("VKAPI_CALL"), "bridge_").unwrap();
        assert_eq!(
            proto,
            "void VKAPI_CALL bridge_vkGetHeap(VkDevice device, VkHeap *pHeap)"
        );
    }
}
