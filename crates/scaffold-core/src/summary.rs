//! End-of-run "next steps" text

use crate::product::HelpLink;
use crate::runtime::PackageManager;
use colored::Colorize;
use console::measure_text_width;

/// Next steps for the user, reflecting what already ran
pub fn next_steps(project_name: &str, pm: PackageManager, installed: bool, ran: bool) -> Vec<String> {
    let install = pm.install_command();
    let dev = pm.dev_command();

    vec![
        format!("cd {}", project_name),
        if installed {
            format!("✓ already ran {}", install)
        } else {
            install.to_string()
        },
        if ran {
            format!("✓ dev server is running ({})", dev)
        } else {
            dev.to_string()
        },
    ]
}

/// Render the summary as a rounded box, ready to print
pub fn render_box(steps: &[String], links: &[HelpLink]) -> String {
    let mut lines = vec!["Next steps:".cyan().bold().to_string()];
    lines.extend(steps.iter().cloned());

    if !links.is_empty() {
        lines.push(String::new());
        lines.push("Helpful links:".cyan().bold().to_string());
        for link in links {
            lines.push(format!("  {} {}", format!("{}:", link.title).cyan(), link.url));
        }
    }

    let width = lines.iter().map(|l| measure_text_width(l)).max().unwrap_or(0);
    let border = "─".repeat(width + 4);

    let mut out = format!("{}\n", format!("╭{}╮", border).cyan());
    for line in &lines {
        let pad = width - measure_text_width(line);
        out.push_str(&format!(
            "{}  {}{}  {}\n",
            "│".cyan(),
            line,
            " ".repeat(pad),
            "│".cyan()
        ));
    }
    out.push_str(&format!("╰{}╯", border).cyan().to_string());
    out
}
