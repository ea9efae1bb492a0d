//! Maven-compatible version ordering.
//!
//! Reproduces Maven's `ComparableVersion` semantics: versions are split on
//! `.` and `-` and at every digit/letter transition, a `-` (or a transition)
//! opens a nested sublist, numeric tokens compare by value, and qualifiers
//! compare by a fixed rank table with unknown qualifiers ordered last among
//! themselves lexicographically. Trailing null tokens (zeros, release
//! qualifiers) are canonicalized away, so `"1.0"` equals `"1"` and
//! `"1.0-alpha"` sorts below `"1"`. The empty string is the lowest version.
//!
//! Comparison never fails: tokens that cannot be classified as numbers are
//! ordered as qualifiers.

use std::cmp::Ordering;
use std::fmt;

/// Known qualifiers in rank order. The empty string is the release marker;
/// unknown qualifiers sort after `sp`.
const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];

/// A version string parsed into its canonical, totally ordered form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenVersion {
    items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Number(u128),
    Qualifier(String),
    Sublist(Vec<Item>),
}

/// Compares two Maven version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    MavenVersion::parse(a).cmp(&MavenVersion::parse(b))
}

impl MavenVersion {
    /// Parsing is total: any string yields a comparable value.
    pub fn parse(version: &str) -> Self {
        let version = version.trim().to_lowercase();
        let bytes = version.as_bytes();

        // Stack of open lists; a `-` or a digit/letter transition opens a
        // sublist that captures everything to its right.
        let mut stack: Vec<Vec<Item>> = vec![Vec::new()];
        let mut start = 0;
        let mut is_digit = false;

        for (i, &c) in bytes.iter().enumerate() {
            match c {
                b'.' => {
                    let item = if i == start {
                        Item::Number(0)
                    } else {
                        parse_item(is_digit, &version[start..i])
                    };
                    current(&mut stack).push(item);
                    start = i + 1;
                }
                b'-' => {
                    let item = if i == start {
                        Item::Number(0)
                    } else {
                        parse_item(is_digit, &version[start..i])
                    };
                    current(&mut stack).push(item);
                    start = i + 1;
                    stack.push(Vec::new());
                }
                b'0'..=b'9' => {
                    if !is_digit && i > start {
                        let q = canonical_qualifier(&version[start..i], true);
                        current(&mut stack).push(Item::Qualifier(q));
                        start = i;
                        stack.push(Vec::new());
                    }
                    is_digit = true;
                }
                _ => {
                    if is_digit && i > start {
                        current(&mut stack).push(parse_item(true, &version[start..i]));
                        start = i;
                        stack.push(Vec::new());
                    }
                    is_digit = false;
                }
            }
        }
        if version.len() > start {
            current(&mut stack).push(parse_item(is_digit, &version[start..]));
        }

        // Close sublists innermost-first, canonicalizing each level.
        while stack.len() > 1 {
            let mut list = stack.pop().unwrap_or_default();
            normalize(&mut list);
            if !list.is_empty() {
                current(&mut stack).push(Item::Sublist(list));
            }
        }
        let mut items = stack.pop().unwrap_or_default();
        normalize(&mut items);

        Self { items }
    }

    /// Canonical text form: tokens joined by `.`, sublists introduced by `-`.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_lists(&self.items, &other.items)
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn current(stack: &mut [Vec<Item>]) -> &mut Vec<Item> {
    stack.last_mut().expect("stack holds at least the root list")
}

fn parse_item(is_digit: bool, token: &str) -> Item {
    if is_digit {
        let significant = token.trim_start_matches('0');
        if significant.is_empty() {
            return Item::Number(0);
        }
        // Numbers beyond u128 degrade to qualifier ordering; comparison
        // must never abort on a malformed or oversized token.
        match significant.parse::<u128>() {
            Ok(n) => Item::Number(n),
            Err(_) => Item::Qualifier(canonical_qualifier(token, false)),
        }
    } else {
        Item::Qualifier(canonical_qualifier(token, false))
    }
}

/// Expands one-letter shorthands (`a1` => `alpha-1`) and release aliases.
fn canonical_qualifier(token: &str, followed_by_digit: bool) -> String {
    let token = if followed_by_digit && token.len() == 1 {
        match token {
            "a" => "alpha",
            "b" => "beta",
            "m" => "milestone",
            other => other,
        }
    } else {
        token
    };
    match token {
        "ga" | "final" | "release" => String::new(),
        "cr" => "rc".to_string(),
        other => other.to_string(),
    }
}

/// Rank key: known qualifiers by table position, unknown ones after all
/// known positions, ordered among themselves by text.
fn qualifier_rank(q: &str) -> (usize, &str) {
    QUALIFIERS
        .iter()
        .position(|known| *known == q)
        .map_or((QUALIFIERS.len(), q), |i| (i, ""))
}

fn is_release_qualifier(q: &str) -> bool {
    q.is_empty()
}

/// Drops trailing null tokens (zeros, release qualifiers, empty sublists),
/// scanning past populated sublists so `1.0-alpha` canonicalizes to
/// `1-alpha`.
fn normalize(items: &mut Vec<Item>) {
    for i in (0..items.len()).rev() {
        match &items[i] {
            Item::Number(0) => {
                items.remove(i);
            }
            Item::Qualifier(q) if is_release_qualifier(q) => {
                items.remove(i);
            }
            Item::Sublist(sub) if sub.is_empty() => {
                items.remove(i);
            }
            Item::Sublist(_) => {}
            _ => break,
        }
    }
}

fn cmp_lists(a: &[Item], b: &[Item]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let ord = cmp_items(a.get(i), b.get(i));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn cmp_items(a: Option<&Item>, b: Option<&Item>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(item), None) => cmp_to_null(item),
        (None, Some(item)) => cmp_to_null(item).reverse(),
        (Some(x), Some(y)) => match (x, y) {
            (Item::Number(m), Item::Number(n)) => m.cmp(n),
            // Numbers dominate both qualifiers and sublists.
            (Item::Number(_), _) => Ordering::Greater,
            (_, Item::Number(_)) => Ordering::Less,
            (Item::Qualifier(p), Item::Qualifier(q)) => qualifier_rank(p).cmp(&qualifier_rank(q)),
            (Item::Qualifier(_), Item::Sublist(_)) => Ordering::Less,
            (Item::Sublist(_), Item::Qualifier(_)) => Ordering::Greater,
            (Item::Sublist(p), Item::Sublist(q)) => cmp_lists(p, q),
        },
    }
}

/// Comparison against the implicit padding token: zero for numbers, the
/// release qualifier for qualifiers.
fn cmp_to_null(item: &Item) -> Ordering {
    match item {
        Item::Number(0) => Ordering::Equal,
        Item::Number(_) => Ordering::Greater,
        Item::Qualifier(q) => qualifier_rank(q).cmp(&qualifier_rank("")),
        Item::Sublist(items) => items
            .iter()
            .map(cmp_to_null)
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal),
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_items(&self.items, f)
    }
}

fn fmt_items(items: &[Item], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        match item {
            Item::Number(n) => {
                if i > 0 {
                    write!(f, ".")?;
                }
                write!(f, "{n}")?;
            }
            Item::Qualifier(q) => {
                if i > 0 {
                    write!(f, ".")?;
                }
                write!(f, "{q}")?;
            }
            Item::Sublist(sub) => {
                write!(f, "-")?;
                fmt_items(sub, f)?;
            }
        }
    }
    Ok(())
}
