use std::path::Path;

/// Encodes a working directory the way the assistant names its project log directories
///
/// Every character that is not an ASCII letter or digit becomes `-`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use newprompt::utils::project_slug;
///
/// assert_eq!(
///     project_slug(Path::new("/home/talmolab/Desktop/SalkResearch")),
///     "-home-talmolab-Desktop-SalkResearch"
/// );
/// assert_eq!(project_slug(Path::new("/srv/my.app/v2_x")), "-srv-my-app-v2-x");
/// ```
pub fn project_slug(path: &Path) -> String {
    path.to_string_lossy()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home
        && let Ok(rest) = path.strip_prefix(home)
    {
        return if rest.as_os_str().is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", rest.display())
        };
    }

    path.to_string_lossy().into_owned()
}
