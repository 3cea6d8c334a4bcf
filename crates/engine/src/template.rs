// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template rendering for the `template` action.
//!
//! Builds a `handlebars` registry: a small general-purpose helper set
//! registered first, then one helper per fact registered over it, so
//! facts win on name collision with a helper of the same name.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use handlebars::{
    handlebars_helper, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::Value;
use thiserror::Error;

use forgecfg_core::{EnvSnapshot, FactTable};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

handlebars_helper!(hb_upper: |s: str| s.to_uppercase());
handlebars_helper!(hb_lower: |s: str| s.to_lowercase());
handlebars_helper!(hb_trim: |s: str| s.trim().to_string());
handlebars_helper!(hb_quote: |s: str| format!("\"{s}\""));
handlebars_helper!(hb_b64enc: |s: str| STANDARD.encode(s.as_bytes()));
handlebars_helper!(hb_default: |v: Value, d: Value| if v.is_null() { d } else { v });

fn env_helper(
    snapshot: EnvSnapshot,
) -> impl Fn(&Helper, &Handlebars, &handlebars::Context, &mut RenderContext, &mut dyn Output) -> HelperResult
{
    move |h: &Helper, _: &Handlebars, _: &handlebars::Context, _: &mut RenderContext, out: &mut dyn Output| {
        let name = h
            .param(0)
            .and_then(|v| v.value().as_str())
            .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex("env", 0))?;
        out.write(snapshot.get(name))?;
        Ok(())
    }
}

fn join_helper(
    h: &Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let sep = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex("join", 0))?;
    let items = h
        .param(1)
        .and_then(|v| v.value().as_array())
        .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex("join", 1))?;
    let rendered: Vec<String> = items
        .iter()
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .collect();
    out.write(&rendered.join(sep))?;
    Ok(())
}

/// Build a `handlebars` registry carrying the general-purpose helper
/// library plus, when `enable_wizard_facts` is set, one helper per fact in
/// `facts` that ignores its arguments and emits the fact's string value.
pub fn build_registry(
    facts: &FactTable,
    env: &EnvSnapshot,
    enable_wizard_facts: bool,
) -> Handlebars<'static> {
    let mut hb = Handlebars::new();
    hb.set_strict_mode(false);

    hb.register_helper("upper", Box::new(hb_upper));
    hb.register_helper("lower", Box::new(hb_lower));
    hb.register_helper("trim", Box::new(hb_trim));
    hb.register_helper("quote", Box::new(hb_quote));
    hb.register_helper("b64enc", Box::new(hb_b64enc));
    hb.register_helper("default", Box::new(hb_default));
    hb.register_helper("join", Box::new(join_helper));
    hb.register_helper("env", Box::new(env_helper(env.clone())));

    if enable_wizard_facts {
        for (key, value) in facts.iter() {
            let value = value.to_string();
            hb.register_helper(
                key,
                Box::new(
                    move |_: &Helper,
                          _: &Handlebars,
                          _: &handlebars::Context,
                          _: &mut RenderContext,
                          out: &mut dyn Output|
                          -> HelperResult {
                        out.write(&value)?;
                        Ok(())
                    },
                ),
            );
        }
    }

    hb
}

/// Render `template_src` against `template_config` (the opaque
/// user-supplied configuration value) using the helper registry built
/// from `facts`.
pub fn render(
    template_src: &str,
    template_config: &Value,
    facts: &FactTable,
    env: &EnvSnapshot,
    enable_wizard_facts: bool,
) -> Result<String, TemplateError> {
    let hb = build_registry(facts, env, enable_wizard_facts);
    Ok(hb.render_template(template_src, template_config)?)
}

/// The staging file name for a destination basename: strips a trailing
/// `.tmpl` extension, following the `/tmp/<basename-without-.tmpl>`
/// staging convention.
pub fn staging_basename(dest_basename: &str) -> &str {
    dest_basename.strip_suffix(".tmpl").unwrap_or(dest_basename)
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
