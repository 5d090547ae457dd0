use crate::{RenderContext, fenced};
use wsorch_types::build::BuildResults;
use wsorch_types::compat::CompatSummary;

pub fn render_build_md(
    ctx: &RenderContext,
    results: &BuildResults,
    compat: Option<&CompatSummary>,
) -> String {
    let summary = results.summary();
    let mut out = String::new();
    out.push_str("# Build Report\n\n");
    out.push_str(&format!("Generated: {}\n\n", ctx.generated_at));

    out.push_str("## Summary\n\n");
    out.push_str(&format!("- **Total targets**: {}\n", summary.total));
    out.push_str(&format!("- **Successful**: {}\n", summary.successful));
    out.push_str(&format!("- **Failed**: {}\n", summary.failed));
    out.push_str(&format!(
        "- **Total build time**: {}ms\n\n",
        summary.total_duration_ms
    ));

    if let Some(c) = compat {
        out.push_str("## Compatibility\n\n");
        out.push_str(&format!(
            "- Checked: {}\n- Compatible: {}\n- Warnings: {}\n- Errors: {}\n\n",
            c.total, c.compatible, c.warnings, c.errors
        ));
    }

    out.push_str("## Successful Builds\n\n");
    if summary.successful == 0 {
        out.push_str("_No successful builds._\n\n");
    }
    for r in results.successful() {
        out.push_str(&format!("### {}\n\n", r.target_name));
        out.push_str(&format!("- **Type**: {}\n", r.kind));
        out.push_str(&format!("- **Duration**: {}ms\n", r.duration_ms));
        out.push_str(&format!("- **Path**: {}\n\n", r.path));
    }

    if summary.failed > 0 {
        out.push_str("## Failed Builds\n\n");
        for r in results.failed() {
            out.push_str(&format!("### {}\n\n", r.target_name));
            out.push_str(&format!("- **Type**: {}\n", r.kind));
            out.push_str(&format!("- **Duration**: {}ms\n", r.duration_ms));
            let code = r
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string());
            out.push_str(&format!("- **Exit Code**: {}\n", code));
            out.push_str(&format!("- **Path**: {}\n\n", r.path));
            out.push_str("**Error Output:**\n\n");
            out.push_str(&fenced(&r.stderr));
            out.push('\n');
        }

        out.push_str("## Next Steps\n\n");
        out.push_str("1. Review the error output above\n");
        out.push_str("2. Check dependencies are installed: `npm install`\n");
        out.push_str("3. Re-run a single target to debug: `cd <path> && npm run build`\n");
    } else {
        out.push_str("## Next Steps\n\n");
        out.push_str("All targets built. Publish a package with `cd <path> && npm publish`.\n");
    }

    out
}
