use std::env;
use std::path::PathBuf;

pub fn user_home() -> Option<PathBuf> {
    home::home_dir()
}

pub fn user_data() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("LOCALAPPDATA").map(PathBuf::from)
    }
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Application Support"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| user_home().map(|p| p.join(".local/share")))
    }
}

/// Location of the container shared by every application in `group`.
///
/// Only macOS provisions real group containers; elsewhere the group gets a
/// sibling directory under the user data dir.
pub fn group_container(group: &str) -> Option<PathBuf> {
    if group.trim().is_empty() {
        return None;
    }
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Group Containers").join(group))
    }
    #[cfg(not(target_os = "macos"))]
    {
        user_data().map(|p| p.join(group))
    }
}
