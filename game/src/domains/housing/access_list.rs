use std::collections::HashSet;

/// Lines beyond this are ignored.
pub const MAX_ACCESS_ENTRIES: usize = 100;

/// Player names allowed into a house or through a door, kept together with
/// the text it was parsed from.
///
/// One entry per line: `#` starts a comment, `!name` excludes a player,
/// a lone `*` admits everyone and other entries may use `*` wildcards.
/// Matching ignores case and exclusions always win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessList {
    text: String,
    players: HashSet<String>,
    excluded: HashSet<String>,
    patterns: Vec<String>,
    everyone: bool,
}

impl AccessList {
    pub fn parse(text: &str) -> Self {
        let mut list = AccessList {
            text: text.to_string(),
            ..AccessList::default()
        };
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .take(MAX_ACCESS_ENTRIES);
        for entry in entries {
            let entry = entry.to_lowercase();
            if let Some(name) = entry.strip_prefix('!') {
                let name = name.trim();
                if !name.is_empty() {
                    list.excluded.insert(name.to_string());
                }
            } else if entry == "*" {
                list.everyone = true;
            } else if entry.contains('*') {
                list.patterns.push(entry);
            } else {
                list.players.insert(entry);
            }
        }
        list
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        if self.excluded.contains(&name) {
            return false;
        }
        self.everyone
            || self.players.contains(&name)
            || self
                .patterns
                .iter()
                .any(|pattern| wildcard_match(pattern, &name))
    }
}

fn wildcard_match(pattern: &str, name: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == name;
    }
    let last = parts.len() - 1;
    let mut rest = name;
    for (index, part) in parts.iter().enumerate() {
        if index == 0 {
            match rest.strip_prefix(part) {
                Some(tail) => rest = tail,
                None => return false,
            }
        } else if index == last {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(at) => rest = &rest[at + part.len()..],
                None => return false,
            }
        }
    }
    true
}
