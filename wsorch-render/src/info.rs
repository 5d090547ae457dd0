use crate::RenderContext;
use wsorch_types::info::{DependencyUsage, PackageSummary, WorkspaceInfo};

/// Number of entries listed per "most used" dependency section.
const TOP_DEPENDENCIES: usize = 10;

pub fn render_info_md(ctx: &RenderContext, info: &WorkspaceInfo) -> String {
    let env = &info.environment;
    let mut out = String::new();
    out.push_str("# Workspace Information Report\n\n");
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
    out.push_str(&format!("- **Platform**: {} ({})\n", env.platform, env.arch));
    out.push_str(&format!("- **Working Directory**: {}\n\n", env.cwd));

    out.push_str("## Workspace Overview\n\n");
    match &info.workspace {
        Some(ws) => {
            out.push_str(&format!("- **Name**: {}\n", ws.name));
            out.push_str(&format!("- **Version**: {}\n", ws.version));
            out.push_str(&format!("- **Type**: {}\n", ws.module_type));
            out.push_str(&format!(
                "- **Private**: {}\n",
                if ws.private { "Yes" } else { "No" }
            ));
        }
        None => out.push_str("- **Name**: Unnamed\n"),
    }
    out.push_str(&format!("- **Packages**: {}\n", info.packages.len()));
    out.push_str(&format!("- **Projects**: {}\n", info.projects.len()));
    if !info.apps.is_empty() {
        out.push_str(&format!("- **Apps**: {}\n", info.apps.len()));
    }
    out.push_str(&format!("- **Scripts**: {}\n\n", info.scripts.len()));

    render_members(&mut out, "Packages", &info.packages);
    render_members(&mut out, "Projects", &info.projects);
    if !info.apps.is_empty() {
        render_members(&mut out, "Apps", &info.apps);
    }

    out.push_str("## Dependencies Overview\n\n");
    out.push_str("### Most Used Production Dependencies\n\n");
    render_usage(&mut out, &info.dependencies.production, TOP_DEPENDENCIES);
    out.push_str("### Most Used Development Dependencies\n\n");
    render_usage(&mut out, &info.dependencies.development, TOP_DEPENDENCIES);
    if !info.dependencies.peer.is_empty() {
        out.push_str("### Peer Dependencies\n\n");
        render_usage(&mut out, &info.dependencies.peer, usize::MAX);
    }

    out.push_str(&format!("## Available Scripts ({})\n\n", info.scripts.len()));
    if info.scripts.is_empty() {
        out.push_str("_No scripts._\n");
    }
    for s in &info.scripts {
        out.push_str(&format!("- `{}`\n", s));
    }

    out
}

fn render_members(out: &mut String, title: &str, members: &[PackageSummary]) {
    out.push_str(&format!("## {} ({})\n\n", title, members.len()));
    if members.is_empty() {
        out.push_str("_None._\n\n");
        return;
    }
    for m in members {
        out.push_str(&format!("### {}\n\n", m.name));
        if let Some(err) = &m.error {
            out.push_str(&format!("- **Path**: {}\n", m.relative_path));
            out.push_str(&format!("- **Error**: {}\n\n", err));
            continue;
        }
        out.push_str(&format!("- **Version**: {}\n", m.version));
        out.push_str(&format!("- **Type**: {}\n", m.module_type));
        out.push_str(&format!("- **Path**: {}\n", m.relative_path));
        if !m.description.is_empty() {
            out.push_str(&format!("- **Description**: {}\n", m.description));
        }
        out.push_str(&format!(
            "- **Scripts**: {} ({})\n",
            m.scripts.len(),
            m.scripts.join(", ")
        ));
        out.push_str(&format!("- **Dependencies**: {}\n", m.dependencies.len()));
        out.push_str(&format!(
            "- **Dev Dependencies**: {}\n\n",
            m.dev_dependencies.len()
        ));
    }
}

fn render_usage(out: &mut String, usage: &[DependencyUsage], limit: usize) {
    if usage.is_empty() {
        out.push_str("_None._\n\n");
        return;
    }
    for d in usage.iter().take(limit) {
        out.push_str(&format!("- **{}**: Used in {} package(s)\n", d.name, d.count));
    }
    out.push('\n');
}
