use crate::RenderContext;
use wsorch_types::compat::{CompatSummary, CompatibilityResult};
use wsorch_types::info::EnvironmentInfo;

pub fn render_compat_md(
    ctx: &RenderContext,
    env: &EnvironmentInfo,
    results: &[CompatibilityResult],
) -> String {
    let summary = CompatSummary::from_results(results);
    let mut out = String::new();
    out.push_str("# Package Compatibility Report\n\n");
    out.push_str(&format!("Generated: {}\n\n", ctx.generated_at));

    out.push_str("## Environment\n\n");
    out.push_str(&format!(
        "- **Node.js**: {}\n",
        env.node_version.as_deref().unwrap_or("unknown")
    ));
    out.push_str(&format!(
        "- **npm**: {}\n",
        env.npm_version.as_deref().unwrap_or("unknown")
    ));
    if let Some(pin) = &env.runtime_pin {
        out.push_str(&format!("- **Pinned Node.js**: {}\n", pin));
    }
    out.push('\n');

    out.push_str("## Summary\n\n");
    out.push_str(&format!("- **Total packages**: {}\n", summary.total));
    out.push_str(&format!("- **Compatible**: {}\n", summary.compatible));
    out.push_str(&format!("- **Warnings**: {}\n", summary.warnings));
    out.push_str(&format!("- **Errors**: {}\n\n", summary.errors));

    out.push_str("## Package Details\n\n");
    if results.is_empty() {
        out.push_str("_No packages found._\n\n");
    }

    for r in results {
        out.push_str(&format!("### {} (`{}`)\n\n", r.target_name, r.status.label()));
        if let Some(m) = &r.manifest {
            out.push_str(&format!(
                "- **Version**: {}\n",
                m.version.as_deref().unwrap_or("-")
            ));
            out.push_str(&format!(
                "- **Type**: {}\n",
                m.module_type.as_deref().unwrap_or("commonjs")
            ));
            if !m.engines.is_empty() {
                let engines: Vec<String> = m
                    .engines
                    .iter()
                    .map(|(k, v)| format!("`{} {}`", k, v))
                    .collect();
                out.push_str(&format!("- **Engines**: {}\n", engines.join(", ")));
            }
        }

        if !r.issues.is_empty() {
            out.push_str("\n**Issues:**\n\n");
            for issue in &r.issues {
                out.push_str(&format!("- `{}` {}\n", issue.severity.label(), issue.message));
            }
        }
        out.push_str("\n---\n\n");
    }

    out.push_str("## Recommendations\n\n");
    out.push_str(
        "- Pin the expected Node.js version in `.nvmrc` and use a version manager (nvm, fnm, volta).\n",
    );
    out.push_str("- Declare `engines.node` in every package that depends on a minimum runtime.\n");
    out.push_str("- Check for outdated packages with `npm outdated`.\n");

    out
}
