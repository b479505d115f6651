pub const SEPARATOR: char = '/';
pub const ROOT: &str = "/";

/// placed between the segments of a title that itself looks like a path so
/// the title stays a single entry of its parent
pub const TITLE_JOINER: &str = "_";

fn segments(given: &str) -> Vec<&str> {
    let mut rtn = Vec::new();

    for seg in given.split(SEPARATOR) {
        match seg {
            "" | "." => {}
            ".." => {
                rtn.pop();
            }
            _ => {
                rtn.push(seg);
            }
        }
    }

    rtn
}

/// collapses redundant separators and resolves relative segments. the result
/// is always absolute and never has a trailing separator unless it is the root
pub fn normalize<P>(path: P) -> String
where
    P: AsRef<str>
{
    let segs = segments(path.as_ref());
    let mut rtn = String::with_capacity(path.as_ref().len() + 1);

    if segs.is_empty() {
        rtn.push(SEPARATOR);
    }

    for seg in segs {
        rtn.push(SEPARATOR);
        rtn.push_str(seg);
    }

    rtn
}

/// normalizes a remote title into a single entry name. returns None when
/// nothing is left of it, e.g. ".." or "/"
pub fn entry_name<T>(title: T) -> Option<String>
where
    T: AsRef<str>
{
    let segs = segments(title.as_ref());

    if segs.is_empty() {
        None
    } else {
        Some(segs.join(TITLE_JOINER))
    }
}

/// joins an entry name onto a parent path, both sides normalized first
pub fn join<P, N>(parent: P, name: N) -> String
where
    P: AsRef<str>,
    N: AsRef<str>,
{
    let mut rtn = normalize(parent);

    if let Some(name) = entry_name(name) {
        if rtn.len() > 1 {
            rtn.push(SEPARATOR);
        }

        rtn.push_str(&name);
    }

    rtn
}

/// parent of a normalized path, None for the root
pub fn parent(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }

    match path.rfind(SEPARATOR) {
        Some(0) => Some(ROOT),
        Some(index) => Some(&path[..index]),
        None => None,
    }
}

/// last entry of a normalized path, the root yields itself
pub fn basename(path: &str) -> &str {
    if path == ROOT {
        return path;
    }

    match path.rfind(SEPARATOR) {
        Some(index) => &path[(index + 1)..],
        None => path,
    }
}

/// every ancestor of a normalized path, closest first, ending with the root
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(parent(path), |p| parent(*p))
}
