//! Locate constraint declarations inside a larger page text
//!
//! Property talk pages mix constraint templates with prose and unrelated
//! templates. The scanner tracks `{{`/`}}` depth so that a declaration with a
//! nested template comes back whole; the parser then reports the nesting.

/// Template-name prefix marking a constraint declaration
pub const CONSTRAINT_PREFIX: &str = "Constraint:";

/// A declaration found in a page, with its byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub offset: usize,
    pub text: &'a str,
}

/// Iterator over the constraint declarations of a page
pub struct Declarations<'a> {
    text: &'a str,
    pos: usize,
}

/// Scan `text` for top-level `{{Constraint:...}}` templates
pub fn declarations(text: &str) -> Declarations<'_> {
    Declarations { text, pos: 0 }
}

impl<'a> Declarations<'a> {
    /// End of the template opening at `start`, or the end of the text if it never closes
    fn template_end(&self, start: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut depth = 0usize;
        let mut i = start;
        while i + 1 < bytes.len() {
            match (bytes[i], bytes[i + 1]) {
                (b'{', b'{') => {
                    depth += 1;
                    i += 2;
                }
                (b'}', b'}') => {
                    depth -= 1;
                    i += 2;
                    if depth == 0 {
                        return i;
                    }
                }
                _ => i += 1,
            }
        }
        bytes.len()
    }
}

fn is_constraint(template: &str) -> bool {
    let inner = template.trim_start_matches('{').trim_start();
    inner
        .get(..CONSTRAINT_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(CONSTRAINT_PREFIX))
}

impl<'a> Iterator for Declarations<'a> {
    type Item = Declaration<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let start = self.pos + self.text[self.pos..].find("{{")?;
            let end = self.template_end(start);
            self.pos = end;

            let candidate = &self.text[start..end];
            if is_constraint(candidate) {
                return Some(Declaration {
                    offset: start,
                    text: candidate,
                });
            }
        }
        None
    }
}
