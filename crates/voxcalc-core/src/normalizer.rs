//! Lexical normalizer — spoken phrase → canonical arithmetic expression
//!
//! The normalizer is an explicit, ordered list of stages. Each stage holds
//! rules (a compiled matcher plus a rewrite) and every rule makes one
//! deterministic pass over the text produced by the previous rule.
//!
//! # Pipeline
//!
//! 1. `lowercase` — lower-case, split `twenty-five` into `twenty five`
//! 2. `numbers` — number words (and `negative N` forms) → digits
//! 3. `fillers` — drop `what is`, `calculate`, `?`, ...
//! 4. `compounds` — fold runs such as `20 5` → `25`, `3 100` → `300`
//! 5. `signs` — `minus N` / `negative N` / `ऋणात्मक N` → `-N`
//! 6. `operators` — `plus`, `divided by`, `गुणा`, ... → `+ - * / =`
//! 7. `functions` — roots, powers, logs, constants, factorial, rounding,
//!    hyperbolics, angle-unit conversions → function tokens
//! 8. `trigonometry` — `sine of 30 degrees` → `(Math.sin(0.5235987755982988))`
//! 9. `whitespace` — collapse runs and trim
//!
//! # Guarantees
//!
//! - **Total**: never fails; unresolved text passes through to the evaluator
//! - **Deterministic**: same phrase always produces the same expression
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`
//!
//! Idempotence rests on token protection: `Math.*` names (already present
//! in the input, or emitted by a rule) are split out of the text and no
//! later rule ever sees them.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::builtins;
use crate::lexicon;

// ── Public API ─────────────────────────────────────────────

/// Normalize a natural-language phrase into a canonical expression
pub fn normalize(phrase: &str) -> String {
    PIPELINE.run(phrase)
}

/// Names of the pipeline stages in execution order
pub fn stage_names() -> Vec<&'static str> {
    PIPELINE.stages.iter().map(|s| s.name).collect()
}

/// Run the pipeline and record the text after every stage
///
/// Returns `(stage name, text after stage)` pairs; useful for explaining
/// how a phrase was understood.
pub fn trace(phrase: &str) -> Vec<(&'static str, String)> {
    let mut steps = Vec::new();
    let mut segments = protect(phrase);
    for stage in &PIPELINE.stages {
        segments = stage.apply(segments);
        steps.push((stage.name, render(&segments)));
    }
    steps
}

// ── Segments ───────────────────────────────────────────────

/// Piece of the working text: rewritable text or a protected token
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Token(String),
}

static PROTECTED: Lazy<Regex> = Lazy::new(|| {
    let names: Vec<String> = builtins::FUNCTIONS
        .iter()
        .map(|f| f.name)
        .chain(builtins::CONSTANTS.iter().map(|c| c.name))
        .map(regex::escape)
        .collect();
    Regex::new(&format!(r"(?i)\bmath\.({})\b", names.join("|")))
        .expect("protected token pattern is valid")
});

/// Split text into segments, canonicalizing every `Math.<name>` token
fn protect(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in PROTECTED.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(canonical) = builtins::canonical_name(name.as_str()) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(text[last..whole.start()].to_string()));
        }
        segments.push(Segment::Token(format!("{}{}", builtins::NAMESPACE, canonical)));
        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }
    segments
}

fn render(segments: &[Segment]) -> String {
    let text: String = segments
        .iter()
        .map(|s| match s {
            Segment::Text(t) | Segment::Token(t) => t.as_str(),
        })
        .collect();
    text.trim().to_string()
}

// ── Rules ──────────────────────────────────────────────────

/// How a matched span is rewritten
enum Rewrite {
    /// Regex replacement template (`$1` expands)
    Template(&'static str),
    /// Matched phrase, whitespace-collapsed, looked up in a table
    Lookup(HashMap<String, String>),
    /// Computed replacement; `None` leaves the match untouched
    Compute(fn(&Captures) -> Option<String>),
    /// Whole-text transform without a matcher
    Transform(fn(&str) -> String),
}

struct Rule {
    name: &'static str,
    pattern: Option<Regex>,
    rewrite: Rewrite,
}

impl Rule {
    fn template(name: &'static str, pattern: &str, template: &'static str) -> Self {
        Rule {
            name,
            pattern: Some(compile(pattern)),
            rewrite: Rewrite::Template(template),
        }
    }

    fn compute(name: &'static str, pattern: &str, f: fn(&Captures) -> Option<String>) -> Self {
        Rule {
            name,
            pattern: Some(compile(pattern)),
            rewrite: Rewrite::Compute(f),
        }
    }

    fn transform(name: &'static str, f: fn(&str) -> String) -> Self {
        Rule {
            name,
            pattern: None,
            rewrite: Rewrite::Transform(f),
        }
    }

    /// Whole-word alternation over `entries`, longest phrase first
    fn lookup<K, V>(name: &'static str, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = HashMap::new();
        for (phrase, token) in entries {
            table.insert(collapse(phrase.as_ref()), token.as_ref().to_string());
        }

        let mut phrases: Vec<&String> = table.keys().collect();
        phrases.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        let alternation: Vec<String> = phrases
            .iter()
            .map(|p| {
                p.split(' ')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();

        Rule {
            name,
            pattern: Some(compile(&format!(r"\b(?:{})\b", alternation.join("|")))),
            rewrite: Rewrite::Lookup(table),
        }
    }

    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let pattern = match (&self.pattern, &self.rewrite) {
            (_, Rewrite::Transform(f)) => return Cow::Owned(f(text)),
            (Some(p), _) => p,
            (None, _) => return Cow::Borrowed(text),
        };

        match &self.rewrite {
            Rewrite::Template(template) => pattern.replace_all(text, *template),
            Rewrite::Lookup(table) => pattern.replace_all(text, |caps: &Captures| {
                let matched = collapse(&caps[0]);
                table.get(&matched).cloned().unwrap_or(matched)
            }),
            Rewrite::Compute(f) => pattern.replace_all(text, |caps: &Captures| {
                f(caps).unwrap_or_else(|| caps[0].to_string())
            }),
            Rewrite::Transform(_) => Cow::Borrowed(text),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    // Patterns are built from literals and escaped lexicon entries
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid normalizer pattern {}: {}", pattern, e))
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse inner runs but keep one space at the edges, where the text
/// meets a protected token
fn collapse_segment(text: &str) -> String {
    let collapsed = collapse(text);
    if collapsed.is_empty() {
        return if text.is_empty() { String::new() } else { " ".to_string() };
    }
    let lead = if text.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if text.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{}{}{}", lead, collapsed, trail)
}

// ── Stages ─────────────────────────────────────────────────

struct Stage {
    name: &'static str,
    rules: Vec<Rule>,
}

impl Stage {
    fn apply(&self, segments: Vec<Segment>) -> Vec<Segment> {
        let mut segments = segments;
        for rule in &self.rules {
            let mut next = Vec::with_capacity(segments.len());
            for segment in segments {
                match segment {
                    Segment::Token(_) => next.push(segment),
                    Segment::Text(text) => {
                        let rewritten = rule.apply(&text);
                        if let Cow::Owned(ref changed) = rewritten {
                            if *changed != text {
                                tracing::trace!(rule = rule.name, before = %text, after = %changed, "rule applied");
                            }
                        }
                        next.extend(protect(&rewritten));
                    }
                }
            }
            segments = next;
        }
        segments
    }
}

struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    fn run(&self, phrase: &str) -> String {
        let mut segments = protect(phrase);
        for stage in &self.stages {
            let before = render(&segments);
            segments = stage.apply(segments);
            let after = render(&segments);
            if before != after {
                tracing::debug!(stage = stage.name, text = %after, "normalizer stage");
            }
        }
        render(&segments)
    }
}

static PIPELINE: Lazy<Pipeline> = Lazy::new(|| Pipeline {
    stages: vec![
        Stage {
            name: "lowercase",
            rules: vec![
                Rule::transform("lowercase", |text| text.to_lowercase()),
                Rule::template("hyphenated words", r"(\p{L})-(\p{L})", "$1 $2"),
            ],
        },
        Stage {
            name: "numbers",
            rules: vec![Rule::lookup("number words", lexicon::number_entries())],
        },
        Stage {
            name: "fillers",
            rules: vec![
                Rule::lookup(
                    "filler words",
                    lexicon::FILLERS.iter().map(|phrase| (*phrase, " ")),
                ),
                Rule::template("question mark", r"\?", " "),
            ],
        },
        Stage {
            name: "compounds",
            rules: vec![Rule::compute(
                "compound numbers",
                r"-?\d+(?:\.\d+)?(?:\s+(?:and\s+)?-?\d+(?:\.\d+)?)+",
                |caps| Some(fold_numbers(&caps[0])),
            )],
        },
        Stage {
            name: "signs",
            rules: vec![Rule::template(
                "signed literal",
                &format!(r"\b(?:{})\s+(\d+(?:\.\d+)?)", lexicon::SIGN_WORDS.join("|")),
                "-$1",
            )],
        },
        Stage {
            name: "operators",
            rules: vec![Rule::lookup("operator words", lexicon::OPERATORS.iter().copied())],
        },
        Stage {
            name: "functions",
            rules: vec![
                Rule::template("square of", r"\bsquare\s+of\s+(-?\d+(?:\.\d+)?)", "${1}**2"),
                Rule::template("cube root of", r"\bcube\s+root\s+of\s+(-?\d+(?:\.\d+)?)", "(${1})**(1/3)"),
                Rule::template("cube of", r"\bcube\s+of\s+(-?\d+(?:\.\d+)?)", "${1}**3"),
                Rule::template(
                    "factorial of",
                    r"\bfactorial\s+of\s+(-?\d+(?:\.\d+)?)",
                    "${1}!",
                ),
                Rule::template(
                    "maximum of pair",
                    r"\b(?:maximum|max)\s+(?:of\s+)?(-?\d+(?:\.\d+)?)\s*(?:and|,)\s*(-?\d+(?:\.\d+)?)",
                    "Math.max(${1}, ${2})",
                ),
                Rule::template(
                    "minimum of pair",
                    r"\b(?:minimum|min)\s+(?:of\s+)?(-?\d+(?:\.\d+)?)\s*(?:and|,)\s*(-?\d+(?:\.\d+)?)",
                    "Math.min(${1}, ${2})",
                ),
                Rule::lookup("function words", lexicon::FUNCTIONS.iter().copied()),
            ],
        },
        Stage {
            name: "trigonometry",
            rules: vec![
                Rule::compute(
                    "inverse trig",
                    &format!(
                        r"\b(?:arc\s*|inverse\s+)({})\s*(?:of\s+)?{}",
                        TRIG_NAMES,
                        ANGLE_OPERAND.as_str()
                    ),
                    inverse_trig,
                ),
                Rule::compute(
                    "trig in degrees",
                    &format!(
                        r"\b({})\s*(?:of\s+)?{}\s*(?:degrees?\b|°)",
                        TRIG_NAMES,
                        ANGLE_OPERAND.as_str()
                    ),
                    forward_trig,
                ),
                Rule::compute(
                    "short trig",
                    &format!(
                        r"\b({})\s*(?:of\s+)?{}",
                        SHORT_TRIG_NAMES,
                        ANGLE_OPERAND.as_str()
                    ),
                    forward_trig,
                ),
            ],
        },
        Stage {
            name: "whitespace",
            rules: vec![Rule::transform("collapse whitespace", collapse_segment)],
        },
    ],
});

// ── Compound numbers ───────────────────────────────────────

const SCALES: &[u64] = &[1_000, 100_000, 1_000_000, 10_000_000, 1_000_000_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Place {
    Unit,
    Tens,
    Hundred,
    Scale(u64),
    Other,
}

fn place(value: u64) -> Place {
    match value {
        100 => Place::Hundred,
        v if SCALES.contains(&v) => Place::Scale(v),
        v if (20..=90).contains(&v) && v % 10 == 0 => Place::Tens,
        v if v < 100 => Place::Unit,
        _ => Place::Other,
    }
}

/// Accumulates a run of number-word values into one integer
#[derive(Debug)]
struct Folder {
    negative: bool,
    total: u64,
    current: u64,
    last: Place,
    largest_scale: u64,
    scaled: bool,
    count: usize,
}

impl Folder {
    fn start(value: u64, negative: bool) -> Self {
        Folder {
            negative,
            total: 0,
            current: value,
            last: place(value),
            largest_scale: 0,
            scaled: false,
            count: 1,
        }
    }

    /// Try to absorb the next value; `false` leaves the folder unchanged
    fn push(&mut self, value: u64, joined_by_and: bool) -> bool {
        if joined_by_and && !(self.scaled && matches!(self.last, Place::Hundred | Place::Scale(_))) {
            return false;
        }

        let next = place(value);
        let accepted = match (self.last, next) {
            (Place::Tens, Place::Unit) if (1..=9).contains(&value) && !joined_by_and => {
                self.current += value;
                true
            }
            (Place::Hundred | Place::Scale(_), Place::Unit | Place::Tens) => {
                self.current += value;
                true
            }
            (Place::Unit | Place::Tens, Place::Hundred) if (1..100).contains(&self.current) => {
                self.current *= 100;
                self.scaled = true;
                true
            }
            (Place::Unit | Place::Tens | Place::Hundred, Place::Scale(scale))
                if self.current > 0 && (self.largest_scale == 0 || scale < self.largest_scale) =>
            {
                match self.current.checked_mul(scale).and_then(|v| v.checked_add(self.total)) {
                    Some(total) => {
                        self.total = total;
                        self.current = 0;
                        self.largest_scale = scale;
                        self.scaled = true;
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        };

        if accepted {
            self.last = next;
            self.count += 1;
        }
        accepted
    }

    fn value(&self) -> String {
        let magnitude = self.total + self.current;
        if self.negative && magnitude != 0 {
            format!("-{}", magnitude)
        } else {
            magnitude.to_string()
        }
    }
}

static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("number token pattern is valid"));

/// Fold a whitespace-separated run of numbers into compound values
///
/// `"20 5"` → `"25"`, `"2 1000 3 100"` → `"2300"`, `"2 3"` stays `"2 3"`.
fn fold_numbers(run: &str) -> String {
    let mut out = String::new();
    // folder plus the byte range of the run it has absorbed
    let mut current: Option<(Folder, usize, usize)> = None;
    let mut last = 0;

    for m in NUMBER_TOKEN.find_iter(run) {
        let separator = &run[last..m.start()];
        last = m.end();
        let parsed = whole_number(m.as_str());

        if let (Some((folder, _, end)), Some((false, value))) = (current.as_mut(), parsed) {
            if folder.push(value, separator.trim() == "and") {
                *end = m.end();
                continue;
            }
        }

        flush(&mut out, run, current.take());
        out.push_str(separator);
        match parsed {
            Some((negative, value)) => {
                current = Some((Folder::start(value, negative), m.start(), m.end()));
            }
            None => out.push_str(m.as_str()),
        }
    }

    flush(&mut out, run, current.take());
    out.push_str(&run[last..]);
    out
}

fn flush(out: &mut String, run: &str, current: Option<(Folder, usize, usize)>) {
    if let Some((folder, start, end)) = current {
        if folder.count > 1 {
            out.push_str(&folder.value());
        } else {
            out.push_str(&run[start..end]);
        }
    }
}

/// `(negative, magnitude)` for an integer token; decimals never fold
fn whole_number(token: &str) -> Option<(bool, u64)> {
    if token.contains('.') {
        return None;
    }
    match token.strip_prefix('-') {
        Some(digits) => digits.parse().ok().map(|v| (true, v)),
        None => token.parse().ok().map(|v| (false, v)),
    }
}

// ── Trigonometry ───────────────────────────────────────────

/// Numeric operand, bare or in parentheses: `30`, `(30)`, `( -0.5 )`
///
/// Captures the number in group 2 (parenthesized) or group 3 (bare).
static ANGLE_OPERAND: Lazy<String> = Lazy::new(|| {
    let angle = r"-?\d+(?:\.\d+)?";
    format!(r"(?:\(\s*({0})\s*\)|({0}))", angle)
});
const TRIG_NAMES: &str =
    "cosecant|cotangent|cosine|secant|tangent|sine|cosec|csc|cot|cos|sec|sin|tan";
const SHORT_TRIG_NAMES: &str = "cosec|csc|cot|cos|sec|sin|tan";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trig {
    Sin,
    Cos,
    Tan,
    Sec,
    Cosec,
    Cot,
}

impl Trig {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "sin" | "sine" => Some(Trig::Sin),
            "cos" | "cosine" => Some(Trig::Cos),
            "tan" | "tangent" => Some(Trig::Tan),
            "sec" | "secant" => Some(Trig::Sec),
            "cosec" | "csc" | "cosecant" => Some(Trig::Cosec),
            "cot" | "cotangent" => Some(Trig::Cot),
            _ => None,
        }
    }

    /// Emitted expression for the function applied to `radians`
    fn expression(&self, radians: f64) -> String {
        match self {
            Trig::Sin => format!("(Math.sin({}))", radians),
            Trig::Cos => format!("(Math.cos({}))", radians),
            Trig::Tan => format!("(Math.tan({}))", radians),
            Trig::Sec => format!("(1/Math.cos({}))", radians),
            Trig::Cosec => format!("(1/Math.sin({}))", radians),
            Trig::Cot => format!("(1/Math.tan({}))", radians),
        }
    }

    /// Principal inverse in radians
    fn inverse(&self, x: f64) -> f64 {
        match self {
            Trig::Sin => x.asin(),
            Trig::Cos => x.acos(),
            Trig::Tan => x.atan(),
            Trig::Sec => (1.0 / x).acos(),
            Trig::Cosec => (1.0 / x).asin(),
            Trig::Cot => (1.0 / x).atan(),
        }
    }
}

fn operand(caps: &Captures) -> Option<f64> {
    caps.get(2).or_else(|| caps.get(3))?.as_str().parse().ok()
}

fn forward_trig(caps: &Captures) -> Option<String> {
    let trig = Trig::from_word(&caps[1])?;
    let degrees = operand(caps)?;
    let radians = degrees * std::f64::consts::PI / 180.0;
    Some(trig.expression(radians))
}

fn inverse_trig(caps: &Captures) -> Option<String> {
    let trig = Trig::from_word(&caps[1])?;
    let x = operand(caps)?;
    let radians = trig.inverse(x);
    if !radians.is_finite() {
        return None;
    }
    Some(format!("({}*180/Math.PI)", radians))
}
