//! Import-command generation.
//!
//! Every resource the templates render gets exactly one `terraform import`
//! command, and the command list is sorted so the script is identical across
//! runs for the same stack.

use super::naming::tf_name;
use crate::stack::Resource;

/// One import command per resource: `terraform import <type>.<name> <key>`.
pub fn generate_import_commands(resources: &[Resource]) -> Vec<String> {
    let mut sorted: Vec<&Resource> = resources.iter().collect();
    sorted.sort_by(|a, b| {
        a.resource_type
            .cmp(&b.resource_type)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });

    sorted
        .iter()
        .map(|resource| {
            format!(
                "terraform import {}.{} {}",
                resource.resource_type,
                tf_name(&resource.identifier),
                resource.import_key
            )
        })
        .collect()
}

/// The commands joined into script content, ready to write as `import.sh`.
pub fn import_script(resources: &[Resource]) -> String {
    let mut script = generate_import_commands(resources).join("\n");
    script.push('\n');
    script
}
