//! Handlebars helpers injected into every template render.
//!
//! Helpers are enumerated by an explicit [`HelperRegistry`] handed to the
//! generator, so the full set of functions a template may call is visible in
//! one place and there is no global registry to mutate.

use std::collections::BTreeMap;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason, ScopedJson,
};
use serde_json::Value;

use super::naming::tf_name;
use super::policy::{decode_policy_document, string_or_seq};
use crate::stack::Resource;

/// The fixed set of helpers available to templates.
pub struct HelperRegistry {
    entries: Vec<(&'static str, Box<dyn HelperDef + Send + Sync>)>,
}

impl HelperRegistry {
    /// `lookup`, `tf_name`, `format_json`, `parse_policy`, `string_list`.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                ("lookup", Box::new(lookup_helper)),
                ("tf_name", Box::new(tf_name_helper)),
                ("format_json", Box::new(format_json_helper)),
                ("parse_policy", Box::new(ParsePolicyHelper)),
                ("string_list", Box::new(StringListHelper)),
            ],
        }
    }

    pub(crate) fn install(self, handlebars: &mut Handlebars<'_>) {
        for (name, helper) in self.entries {
            handlebars.register_helper(name, helper);
        }
    }
}

/// Symbolic reference to another generated resource's exposed attribute.
pub fn symbolic_reference(resource: &Resource) -> String {
    format!(
        "{}.{}.{}",
        resource.resource_type,
        tf_name(&resource.identifier),
        resource.output_key
    )
}

/// Resolve a raw attribute value against the canonical-key index.
///
/// A hit becomes a symbolic reference to the generated resource; a miss is
/// re-quoted as a literal. Pure, so repeated calls with the same index always
/// agree.
pub fn resolve_reference(index: &BTreeMap<String, Resource>, raw: &str) -> String {
    match index.get(raw) {
        Some(resource) => symbolic_reference(resource),
        None => format!("\"{}\"", raw),
    }
}

/// `{{lookup <value>}}` — cross-reference resolution against the stack index.
///
/// Reads the index from the root data context, which every template receives.
fn lookup_helper(
    h: &Helper,
    _: &Handlebars,
    ctx: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let raw = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("lookup", 0))?
        .value()
        .as_str()
        .unwrap_or_default();

    let entry = ctx.data().get("index").and_then(|index| index.get(raw));

    match entry {
        Some(value) => {
            let resource: Resource = serde_json::from_value(value.clone()).map_err(|err| {
                RenderErrorReason::Other(format!("malformed index entry for '{}': {}", raw, err))
            })?;
            out.write(&symbolic_reference(&resource))?;
        }
        None => out.write(&format!("\"{}\"", raw))?,
    }

    Ok(())
}

/// `{{tf_name <value>}}` — identifier normalization.
fn tf_name_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let name = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("tf_name", 0))?
        .value()
        .as_str()
        .unwrap_or_default();

    out.write(&tf_name(name))?;
    Ok(())
}

/// `{{format_json <value>}}` — re-indent an embedded JSON string.
fn format_json_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let raw = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("format_json", 0))?
        .value()
        .as_str()
        .unwrap_or_default();

    let parsed: Value = serde_json::from_str(raw)
        .map_err(|err| RenderErrorReason::Other(format!("format_json: invalid JSON: {}", err)))?;
    let pretty = serde_json::to_string_pretty(&parsed)
        .map_err(|err| RenderErrorReason::Other(format!("format_json: {}", err)))?;

    out.write(&pretty)?;
    Ok(())
}

/// `(parse_policy <document> <owner>)` — decode a percent-encoded policy
/// document into a value templates can traverse. The second parameter names
/// the owning resource so a decode failure is diagnosable.
struct ParsePolicyHelper;

impl HelperDef for ParsePolicyHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let raw = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("parse_policy", 0))?
            .value()
            .as_str()
            .unwrap_or_default();
        let owner = h
            .param(1)
            .and_then(|p| p.value().as_str())
            .unwrap_or("<unknown>");

        let document = decode_policy_document(raw).map_err(|err| {
            RenderErrorReason::Other(format!(
                "unable to decode policy document for '{}': {:#}",
                owner, err
            ))
        })?;

        Ok(ScopedJson::Derived(document))
    }
}

/// `(string_list <value>)` — collapse a scalar-or-list policy field into a
/// list templates can iterate.
struct StringListHelper;

impl HelperDef for StringListHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let value = h.param(0).map(|p| p.value().clone()).unwrap_or(Value::Null);
        let items = string_or_seq(&value).into_iter().map(Value::String).collect();

        Ok(ScopedJson::Derived(Value::Array(items)))
    }
}
