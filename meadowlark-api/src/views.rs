//! JSON stand-ins for rendered pages. Every page view carries the flash
//! message taken for the current request.

use axum::{
    http::{header, HeaderMap},
    Json,
};
use serde_json::{json, Value};

use crate::middleware::SessionContext;

pub fn render(page: &str, session: &SessionContext, body: Value) -> Json<Value> {
    let mut view = match body {
        Value::Object(map) => map,
        Value::Null => serde_json::Map::new(),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    view.insert("page".to_string(), json!(page));
    view.insert("flash".to_string(), json!(session.flash()));
    Json(Value::Object(view))
}

/// True for XHR calls and for clients whose `Accept` header ranks JSON at
/// least as high as HTML. `*/*` alone therefore answers JSON. A request with
/// no `Accept` header is treated as a browser form post.
pub fn wants_json(headers: &HeaderMap) -> bool {
    let is_xhr = headers
        .get("x-requested-with")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    if is_xhr {
        return true;
    }

    let Some(accept) = headers.get(header::ACCEPT).and_then(|h| h.to_str().ok()) else {
        return false;
    };
    let ranges = parse_accept(accept);
    match (preference(&ranges, "application", "json"), preference(&ranges, "text", "html")) {
        (None, _) => false,
        (Some(_), None) => true,
        // JSON is offered first, so it wins ties.
        (Some(json), Some(html)) => json.outranks_or_ties(&html),
    }
}

struct MediaRange<'a> {
    kind: &'a str,
    subtype: &'a str,
    q: f32,
}

/// How well one offered type is accepted: quality, specificity of the
/// matching range (`*/*` < `type/*` < exact), and its position in the header.
#[derive(Debug, Clone, Copy)]
struct Preference {
    q: f32,
    specificity: u8,
    position: usize,
}

impl Preference {
    fn outranks_or_ties(&self, other: &Preference) -> bool {
        if self.q != other.q {
            return self.q > other.q;
        }
        if self.specificity != other.specificity {
            return self.specificity > other.specificity;
        }
        self.position <= other.position
    }
}

fn parse_accept(accept: &str) -> Vec<MediaRange<'_>> {
    accept
        .split(',')
        .filter_map(|part| {
            let mut params = part.split(';');
            let (kind, subtype) = params.next()?.trim().split_once('/')?;
            let q = params
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|v| v.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(MediaRange { kind: kind.trim(), subtype: subtype.trim(), q })
        })
        .collect()
}

/// The most specific range matching `kind/subtype`, or `None` when nothing
/// matches or the best match has `q=0`.
fn preference(ranges: &[MediaRange<'_>], kind: &str, subtype: &str) -> Option<Preference> {
    let mut best: Option<Preference> = None;
    for (position, range) in ranges.iter().enumerate() {
        let specificity = match (range.kind, range.subtype) {
            ("*", "*") => 0,
            (k, "*") if k.eq_ignore_ascii_case(kind) => 1,
            (k, s) if k.eq_ignore_ascii_case(kind) && s.eq_ignore_ascii_case(subtype) => 2,
            _ => continue,
        };
        let candidate = Preference { q: range.q, specificity, position };
        let better = match best {
            None => true,
            Some(b) => {
                specificity > b.specificity || (specificity == b.specificity && range.q > b.q)
            }
        };
        if better {
            best = Some(candidate);
        }
    }
    best.filter(|p| p.q > 0.0)
}
