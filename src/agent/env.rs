//! Environment fix-up for agent subprocesses.
//!
//! The agent must see a UTF-8 locale (reports may contain non-ASCII text)
//! and a usable `HOME` for the effective user. Fix-ups are computed from a
//! snapshot so the logic stays independent of the live process.

use std::collections::HashMap;

/// Locale forced when the inherited one is not UTF-8.
pub const FALLBACK_LOCALE: &str = "C.UTF-8";

const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_CTYPE", "LANG"];

/// Name and home directory of the user the agent will run as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveUser {
    pub name: Option<String>,
    pub home: Option<String>,
}

impl EffectiveUser {
    /// Resolve the effective uid of this process.
    pub fn current() -> Self {
        Self {
            name: effective_user_name(),
            home: dirs::home_dir()
                .map(|dir| dir.to_string_lossy().into_owned())
                .filter(|home| !home.is_empty()),
        }
    }
}

/// Environment overrides applied on top of the inherited environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFixups(Vec<(String, String)>);

impl EnvFixups {
    /// Compute fix-ups for the current process environment.
    pub fn detect() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_snapshot(&vars, &EffectiveUser::current(), cfg!(unix))
    }

    /// Compute fix-ups for an environment snapshot.
    ///
    /// Missing identity variables are filled from `user`. Locale coercion
    /// only applies when `coerce_locale`.
    pub fn from_snapshot(
        vars: &HashMap<String, String>,
        user: &EffectiveUser,
        coerce_locale: bool,
    ) -> Self {
        let mut fixups = Vec::new();
        let get = |key: &str| vars.get(key).filter(|v| !v.is_empty());

        if coerce_locale
            && !LOCALE_VARS
                .iter()
                .filter_map(|key| get(key))
                .any(|v| is_utf8_locale(v))
        {
            fixups.push(("LANG".to_string(), FALLBACK_LOCALE.to_string()));
            fixups.push(("LC_ALL".to_string(), FALLBACK_LOCALE.to_string()));
        }

        if let Some(name) = &user.name {
            for key in ["USER", "LOGNAME"] {
                if get(key).is_none() {
                    fixups.push((key.to_string(), name.clone()));
                }
            }
        }

        if get("HOME").is_none()
            && let Some(home) = &user.home
        {
            fixups.push(("HOME".to_string(), home.clone()));
        }

        Self(fixups)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_utf8_locale(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.contains("utf-8") || lower.contains("utf8")
}

/// Login name of the effective uid from the user database.
#[cfg(unix)]
fn effective_user_name() -> Option<String> {
    use std::ffi::CStr;
    use std::mem::MaybeUninit;

    let uid = unsafe { libc::geteuid() };
    let mut buf: Vec<libc::c_char> = vec![0; 1024];

    loop {
        let mut pwd = MaybeUninit::<libc::passwd>::uninit();
        let mut entry: *mut libc::passwd = std::ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(uid, pwd.as_mut_ptr(), buf.as_mut_ptr(), buf.len(), &mut entry)
        };

        if rc == libc::ERANGE && buf.len() < 1 << 20 {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 || entry.is_null() {
            return None;
        }

        // pw_name points into `buf`, which outlives this borrow.
        let name = unsafe { CStr::from_ptr((*entry).pw_name) };
        return name
            .to_str()
            .ok()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
    }
}

#[cfg(not(unix))]
fn effective_user_name() -> Option<String> {
    None
}
