use std::path::PathBuf;

/// Host operating system family, as far as temp-dir lookup cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    Other(String),
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            _ => Platform::Other(os.to_string()),
        }
    }
}

/// Ambient lookups the locator needs. Swapped out in tests.
pub trait Environment {
    /// The OS default temporary directory.
    fn temp_dir(&self) -> PathBuf;

    fn var(&self, name: &str) -> Option<String>;
}

pub struct HostEnvironment;

impl Environment for HostEnvironment {
    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Temporary directories to clean on `platform`, in cleaning order.
///
/// On Linux `/tmp` and the default temp dir usually resolve to the same
/// place; both are kept so each gets its own report section.
pub fn locate(platform: &Platform, env: &dyn Environment) -> Vec<PathBuf> {
    match platform {
        Platform::Windows => vec![
            env.temp_dir(),
            PathBuf::from(expand_vars(r"%SystemRoot%\Temp", env)),
        ],
        Platform::Linux => vec![PathBuf::from("/tmp"), env.temp_dir()],
        Platform::Other(_) => vec![],
    }
}

/// Expand `%NAME%` references. Unset or unterminated references stay as-is.
pub fn expand_vars(input: &str, env: &dyn Environment) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                match env.var(name).filter(|_| !name.is_empty()) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('%');
                        out.push_str(name);
                        out.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
