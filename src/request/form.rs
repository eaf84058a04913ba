use serde_json::{Map, Value};

/// Parse an `application/x-www-form-urlencoded` payload (or query string) into
/// a nested JSON object.
///
/// Bracketed keys build nested structures:
///
/// - `user[id]=42` → `{"user": {"id": "42"}}`
/// - `tags[]=a&tags[]=b` → `{"tags": ["a", "b"]}`
/// - `a=1&a=2` → `{"a": "2"}` (last write wins)
///
/// Keys without a closing bracket are kept verbatim.
#[must_use]
pub fn parse_form(input: &[u8]) -> Value {
    let mut root = Value::Object(Map::new());
    for (key, value) in url::form_urlencoded::parse(input) {
        if key.is_empty() {
            continue;
        }
        let parts = split_key(&key);
        insert(&mut root, &parts, Value::String(value.into_owned()));
    }
    root
}

/// Bracket levels split out of a key; deeper brackets stay in the last key verbatim.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Split `a[b][]` into `["a", "b", ""]`.
fn split_key(key: &str) -> Vec<&str> {
    let open = match key.find('[') {
        Some(0) | None => return vec![key],
        Some(open) => open,
    };
    let mut parts = vec![&key[..open]];
    let mut rest = &key[open..];
    while parts.len() <= MAX_NESTING_DEPTH {
        let Some(inner) = rest.strip_prefix('[') else {
            break;
        };
        let Some(close) = inner.find(']') else {
            break;
        };
        parts.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    if parts.len() == 1 {
        // unterminated bracket: keep the raw key
        return vec![key];
    }
    if parts.len() > MAX_NESTING_DEPTH && rest.starts_with('[') {
        parts.push(rest);
    }
    parts
}

fn empty_container(next: &str) -> Value {
    if next.is_empty() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn insert(root: &mut Value, parts: &[&str], value: Value) {
    let mut slot = root;
    for head in parts {
        slot = match child(slot, head) {
            Some(next) => next,
            None => return,
        };
    }
    *slot = value;
}

/// Descend one level, creating or promoting the container as needed.
fn child<'v>(slot: &'v mut Value, head: &str) -> Option<&'v mut Value> {
    if !slot.is_object() && !slot.is_array() {
        *slot = empty_container(head);
    }

    let promote = match slot {
        Value::Array(items) => {
            !(head.is_empty() || head.parse::<usize>().is_ok_and(|i| i <= items.len()))
        }
        _ => false,
    };
    if promote {
        // named key inside a list: promote to an object keyed by position
        if let Value::Array(items) = std::mem::take(slot) {
            *slot = Value::Object(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect(),
            );
        }
    }

    match slot {
        Value::Array(items) => {
            let index = if head.is_empty() {
                items.len()
            } else {
                head.parse::<usize>().unwrap_or(items.len())
            };
            if index == items.len() {
                items.push(Value::Null);
            }
            items.get_mut(index)
        }
        Value::Object(map) => {
            let key = if head.is_empty() {
                map.len().to_string()
            } else {
                head.to_string()
            };
            Some(map.entry(key).or_insert(Value::Null))
        }
        _ => None,
    }
}
