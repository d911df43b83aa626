use bp2bzl_ir::{AttrValue, BazelTarget, BazelTargets, TargetKind};

use crate::context::EmitContext;

/// Banner placed above a directory's hand-maintained BUILD content.
pub const HANDCRAFTED_SECTION_BANNER: &str = "# -----------------------------\n\
# Section: Handcrafted targets.\n\
# -----------------------------\n\n";

/// Quote a string as a Starlark string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render an attribute value. Multi-line values indent their elements one
/// level deeper than `ctx` and put the closing bracket at `ctx`'s level.
pub fn render_value(value: &AttrValue, ctx: &mut EmitContext) -> String {
    match value {
        AttrValue::Bool(true) => "True".to_string(),
        AttrValue::Bool(false) => "False".to_string(),
        AttrValue::Int(i) => i.to_string(),
        AttrValue::String(s) => quote(s),
        AttrValue::List(items) => match items.as_slice() {
            [] => "[]".to_string(),
            [single] => format!("[{}]", render_value(single, ctx)),
            _ => {
                let closing = ctx.indent();
                ctx.push_indent();
                let mut out = String::from("[\n");
                for item in items {
                    out.push_str(&ctx.indent());
                    out.push_str(&render_value(item, ctx));
                    out.push_str(",\n");
                }
                ctx.pop_indent();
                out.push_str(&closing);
                out.push(']');
                out
            }
        },
        AttrValue::Dict(entries) => {
            if entries.is_empty() {
                return "{}".to_string();
            }
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();

            let closing = ctx.indent();
            ctx.push_indent();
            let mut out = String::from("{\n");
            for key in keys {
                out.push_str(&ctx.indent());
                out.push_str(&quote(key));
                out.push_str(": ");
                out.push_str(&render_value(&entries[key], ctx));
                out.push_str(",\n");
            }
            ctx.pop_indent();
            out.push_str(&closing);
            out.push('}');
            out
        }
    }
}

/// Render one target as a rule invocation, or hand-written content behind a
/// section banner.
pub fn render_target(target: &BazelTarget) -> String {
    match &target.kind {
        TargetKind::Handcrafted { content } => {
            let content = content.trim_end();
            if content.is_empty() {
                HANDCRAFTED_SECTION_BANNER.trim_end().to_string()
            } else {
                format!("{}{}", HANDCRAFTED_SECTION_BANNER, content)
            }
        }
        TargetKind::Generated { fixed_attrs, attrs } => {
            let mut ctx = EmitContext::at_level(1);
            let ind = ctx.indent();

            let mut out = format!("{}(\n{}name = {},\n", target.rule_class, ind, quote(&target.name));
            for (name, value) in fixed_attrs {
                out.push_str(&format!("{}{} = {},\n", ind, name, render_value(value, &mut ctx)));
            }

            let mut names: Vec<&String> = attrs.keys().collect();
            names.sort();
            for name in names {
                let value = render_value(&attrs[name], &mut ctx);
                out.push_str(&format!("{}{} = {},\n", ind, name, value));
            }
            out.push(')');
            out
        }
    }
}

/// Render all targets in their current order, separated by a blank line.
pub fn render_targets(targets: &BazelTargets) -> String {
    targets
        .iter()
        .map(render_target)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `load(...)` statements for the rule classes the targets need, one per
/// `.bzl` location.
pub fn load_statements(targets: &BazelTargets) -> String {
    targets
        .load_requirements()
        .into_iter()
        .map(|(location, rules)| {
            let symbols: Vec<String> = rules.into_iter().map(quote).collect();
            format!("load({}, {})", quote(location), symbols.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
