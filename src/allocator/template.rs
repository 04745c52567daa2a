use std::path::Path;

/// Contents for a prompt file: the body (or blank lines to type into) and a footer
/// telling the assistant where to save its plan
pub fn prompt_template(body: &str, plan_path: &Path) -> String {
    let footer = format!(
        "Please write your plan using your plan skill, and save to {}.",
        plan_path.display()
    );
    if body.trim().is_empty() {
        format!("\n\n\n\n{}\n", footer)
    } else {
        format!("{}\n\n{}\n", body.trim_end(), footer)
    }
}
