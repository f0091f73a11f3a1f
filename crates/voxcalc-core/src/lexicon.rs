//! Bilingual lexicon — spoken phrase → canonical token tables
//!
//! English and Hindi vocabularies share one token space: every phrase maps
//! to a digit string, an operator symbol, or a function identifier that the
//! evaluator understands. Tables are plain ordered slices; the normalizer
//! sorts them longest-phrase-first when it compiles its matchers.
//!
//! Hindi words that carry a nukta are listed twice, once with the
//! precomposed letter and once with the base letter + U+093C, because
//! transcription engines emit either form.

/// A lexicon entry: lower-case spoken phrase and its replacement token
pub type Entry = (&'static str, &'static str);

/// English number words 0–20, tens and magnitudes
pub const ENGLISH_NUMBERS: &[Entry] = &[
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
    ("thirty", "30"),
    ("forty", "40"),
    ("fifty", "50"),
    ("sixty", "60"),
    ("seventy", "70"),
    ("eighty", "80"),
    ("ninety", "90"),
    ("hundred", "100"),
    ("thousand", "1000"),
    ("million", "1000000"),
    ("billion", "1000000000"),
];

/// Hindi number words 0–20, tens and magnitudes (including lakh/crore)
pub const HINDI_NUMBERS: &[Entry] = &[
    ("शून्य", "0"),
    ("एक", "1"),
    ("दो", "2"),
    ("तीन", "3"),
    ("चार", "4"),
    ("पांच", "5"),
    ("पाँच", "5"),
    ("छह", "6"),
    ("छः", "6"),
    ("सात", "7"),
    ("आठ", "8"),
    ("नौ", "9"),
    ("दस", "10"),
    ("ग्यारह", "11"),
    ("बारह", "12"),
    ("तेरह", "13"),
    ("चौदह", "14"),
    ("पंद्रह", "15"),
    ("पन्द्रह", "15"),
    ("सोलह", "16"),
    ("सत्रह", "17"),
    ("अठारह", "18"),
    ("उन्नीस", "19"),
    ("बीस", "20"),
    ("तीस", "30"),
    ("चालीस", "40"),
    ("पचास", "50"),
    ("साठ", "60"),
    ("सत्तर", "70"),
    ("अस्सी", "80"),
    ("नब्बे", "90"),
    ("सौ", "100"),
    ("हजार", "1000"),
    ("ह\u{095B}ार", "1000"),
    ("ह\u{091C}\u{093C}ार", "1000"),
    ("लाख", "100000"),
    ("दस लाख", "1000000"),
    ("मिलियन", "1000000"),
    ("करो\u{095C}", "10000000"),
    ("करो\u{0921}\u{093C}", "10000000"),
    ("अरब", "1000000000"),
    ("बिलियन", "1000000000"),
];

/// Prefixes that turn a number word into its negative form
pub const NEGATIVE_PREFIXES: &[&str] = &["negative", "ऋणात्मक"];

/// Words collapsed with a following digit run into a signed literal
pub const SIGN_WORDS: &[&str] = &["minus", "negative", "ऋणात्मक"];

/// Binary operator words and phrases
pub const OPERATORS: &[Entry] = &[
    ("plus", "+"),
    ("minus", "-"),
    ("into", "*"),
    ("times", "*"),
    ("multiplied by", "*"),
    ("x", "*"),
    ("divided by", "/"),
    ("equals", "="),
    ("जो\u{095C}", "+"),
    ("जो\u{0921}\u{093C}", "+"),
    ("घटा", "-"),
    ("गुणा", "*"),
    ("भाग", "/"),
    ("बराबर", "="),
];

/// Function, constant and postfix phrases
///
/// Tokens starting with `Math.` are evaluator function identifiers; the
/// others are literal operator fragments spliced into the expression.
pub const FUNCTIONS: &[Entry] = &[
    // roots
    ("square root of", "Math.sqrt"),
    ("square root", "Math.sqrt"),
    ("root of", "Math.sqrt"),
    ("sqrt of", "Math.sqrt"),
    ("sqrt", "Math.sqrt"),
    ("वर्गमूल", "Math.sqrt"),
    // powers
    ("squared", "**2"),
    ("cubed", "**3"),
    ("cube of", "**3"),
    ("raised to the power of", "**"),
    ("to the power of", "**"),
    ("to the power", "**"),
    ("raised to", "**"),
    ("power of", "**"),
    ("की घात", "**"),
    ("घात", "**"),
    // logarithms
    ("natural logarithm of", "Math.log"),
    ("natural log of", "Math.log"),
    ("natural logarithm", "Math.log"),
    ("natural log", "Math.log"),
    ("logarithm of", "Math.log"),
    ("log of", "Math.log"),
    ("logarithm", "Math.log"),
    ("ln", "Math.log"),
    ("log", "Math.log"),
    ("लघुगणक", "Math.log"),
    // constants
    ("pi", "Math.PI"),
    ("पाई", "Math.PI"),
    ("e", "Math.E"),
    // factorial and remainder
    ("factorial", "!"),
    ("क्रमगुणित", "!"),
    ("modulo", "%"),
    ("mod", "%"),
    ("remainder", "%"),
    ("शेषफल", "%"),
    // rounding and magnitude
    ("absolute value of", "Math.abs"),
    ("absolute value", "Math.abs"),
    ("absolute of", "Math.abs"),
    ("absolute", "Math.abs"),
    ("abs", "Math.abs"),
    ("निरपेक्ष", "Math.abs"),
    ("round off", "Math.round"),
    ("round", "Math.round"),
    ("floor of", "Math.floor"),
    ("floor", "Math.floor"),
    ("ceiling of", "Math.ceil"),
    ("ceiling", "Math.ceil"),
    ("ceil", "Math.ceil"),
    ("random number", "Math.random()"),
    ("random", "Math.random()"),
    ("maximum of", "Math.max"),
    ("maximum", "Math.max"),
    ("max of", "Math.max"),
    ("max", "Math.max"),
    ("अधिकतम", "Math.max"),
    ("minimum of", "Math.min"),
    ("minimum", "Math.min"),
    ("min of", "Math.min"),
    ("min", "Math.min"),
    ("न्यूनतम", "Math.min"),
    // hyperbolic
    ("hyperbolic sine of", "Math.sinh"),
    ("hyperbolic sine", "Math.sinh"),
    ("hyperbolic sin", "Math.sinh"),
    ("sinh of", "Math.sinh"),
    ("sinh", "Math.sinh"),
    ("hyperbolic cosine of", "Math.cosh"),
    ("hyperbolic cosine", "Math.cosh"),
    ("hyperbolic cos", "Math.cosh"),
    ("cosh of", "Math.cosh"),
    ("cosh", "Math.cosh"),
    ("hyperbolic tangent of", "Math.tanh"),
    ("hyperbolic tangent", "Math.tanh"),
    ("hyperbolic tan", "Math.tanh"),
    ("tanh of", "Math.tanh"),
    ("tanh", "Math.tanh"),
    // angle unit conversion
    ("degrees to radians", "*Math.PI/180"),
    ("degree to radian", "*Math.PI/180"),
    ("degrees in radians", "*Math.PI/180"),
    ("in radians", "*Math.PI/180"),
    ("to radians", "*Math.PI/180"),
    ("radians to degrees", "*180/Math.PI"),
    ("radian to degree", "*180/Math.PI"),
    ("radians in degrees", "*180/Math.PI"),
    ("in degrees", "*180/Math.PI"),
    ("to degrees", "*180/Math.PI"),
];

/// Conversational filler dropped after all substitutions
pub const FILLERS: &[&str] = &[
    "what is",
    "what's",
    "how much is",
    "calculate",
    "compute",
    "convert",
    "please",
    "कितना होता है",
    "कितना है",
    "क्या है",
];

/// Full lexicon of number words: plain forms plus negative-prefixed forms
///
/// Returned as owned pairs because the negative forms are generated.
pub fn number_entries() -> Vec<(String, String)> {
    let base: Vec<Entry> = ENGLISH_NUMBERS
        .iter()
        .chain(HINDI_NUMBERS.iter())
        .copied()
        .collect();

    let mut entries: Vec<(String, String)> = base
        .iter()
        .map(|(word, digits)| (word.to_string(), digits.to_string()))
        .collect();

    for prefix in NEGATIVE_PREFIXES {
        for (word, digits) in &base {
            entries.push((format!("{} {}", prefix, word), format!("-{}", digits)));
        }
    }

    entries
}
