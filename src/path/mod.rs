use crate::vfs::VirtualFs;
use std::io;

#[cfg(test)]
mod tests;

/// Drop the last `/`-separated segment of a path
///
/// `dirname("a/b/c")` is `"a/b"`, `dirname("a")` is `""`.
pub fn dirname(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

/// Create every directory level of `path` through the filesystem handle
///
/// `.` segments are skipped. Empty segments are kept in the accumulated
/// prefix (so a leading `/` survives) but never trigger a `mkdir` of their own.
pub fn mkdir_tree(fs: &dyn VirtualFs, path: &str) -> io::Result<()> {
    let mut current: Vec<&str> = Vec::new();
    for branch in path.split('/') {
        if branch == "." {
            continue;
        }
        current.push(branch);
        if !branch.is_empty() {
            fs.mkdir(&current.join("/"))?;
        }
    }
    Ok(())
}

/// Resolve `path` under the handle's current working directory
pub fn resolve(fs: &dyn VirtualFs, path: &str) -> String {
    resolve_from(&fs.cwd(), path)
}

/// Join the normalized segments of `path` onto `cwd`
///
/// Empty and `.` segments are dropped, `..` pops the previous segment (and is
/// a no-op once nothing is left). The path is always placed under `cwd`,
/// even when it starts with `/`. Symlinks are not considered.
pub fn resolve_from(cwd: &str, path: &str) -> String {
    let mut tree: Vec<&str> = Vec::new();
    for branch in path.split('/') {
        match branch {
            "" | "." => {}
            ".." => {
                tree.pop();
            }
            _ => tree.push(branch),
        }
    }

    let mut joined = String::from(cwd);
    for branch in tree {
        joined.push('/');
        joined.push_str(branch);
    }
    collapse_leading_slashes(&joined)
}

/// Join path fragments with single slashes
///
/// Each part is trimmed and stripped of surrounding slashes; empty and `.`
/// parts disappear. The result is absolute only when the first part was.
pub fn join_paths<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(|part| part.as_ref().trim().trim_matches('/'))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/");

    match parts.first() {
        Some(first) if first.as_ref().starts_with('/') => format!("/{}", joined),
        _ => joined,
    }
}

/// POSIX-style absolute path for `path` as seen from `cwd`
///
/// Absolute inputs ignore `cwd`. `..` at the root stays at the root. The
/// result always starts with `/` and never ends with one (except for `/`).
pub fn absolutize(cwd: &str, path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    let base = if path.starts_with('/') { "" } else { cwd };

    for branch in base.split('/').chain(path.split('/')) {
        match branch {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            _ => stack.push(branch),
        }
    }

    format!("/{}", stack.join("/"))
}

fn collapse_leading_slashes(path: &str) -> String {
    let rest = path.trim_start_matches('/');
    if rest.len() == path.len() {
        path.to_string()
    } else {
        format!("/{}", rest)
    }
}
