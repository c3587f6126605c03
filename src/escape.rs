//! HTML escaping for server-supplied text.
//!
//! Every string the gallery endpoints return is untrusted. Renderers never
//! interpolate a raw `&str`; they interpolate [`Escaped`], which can only be
//! built by running text through [`escape`]. Forgetting to escape a field is
//! therefore a type error rather than an injection bug.
//!
//! Substitution order matters: `&` is replaced first so the entities produced
//! by the later substitutions are not escaped a second time.

use maud::Render;

/// Entity substitutions, applied in this order.
const SUBSTITUTIONS: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('"', "&quot;"),
    ('\'', "&#39;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
];

/// Escape `input` for use in HTML text or a quoted attribute value.
///
/// Total and deterministic: any input (including the empty string) is
/// accepted, and only `& " ' < >` are altered. Escaping already-escaped text
/// escapes its ampersands again; apply this exactly once per raw value.
pub fn escape(input: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(input.to_string(), |text, (from, to)| text.replace(*from, to))
}

/// Text that has already been through [`escape`].
///
/// Rendering an `Escaped` through maud writes it verbatim, so it is never
/// escaped twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped(String);

impl Escaped {
    pub fn new(raw: &str) -> Self {
        Self(escape(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Render for Escaped {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&self.0);
    }
}
