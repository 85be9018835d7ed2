//! LaTeX to equation-script conversion
//!
//! Hangul Office equations use their own script language. Only the common
//! constructs are rewritten; anything unrecognised passes through with its
//! backslash removed, which the equation editor usually still renders.

use std::sync::OnceLock;

use regex::Regex;

use crate::xml::escape_xml;

/// Fixed command replacements, applied in order
const SYMBOLS: &[(&str, &str)] = &[
    (r"\geq", ">="),
    (r"\leq", "<="),
    (r"\neq", "<>"),
    (r"\times", "times"),
    (r"\cdot", "cdot"),
    (r"\cdots", "cdots"),
    (r"\ldots", "ldots"),
    (r"\infty", "inf"),
    (r"\pm", "+-"),
    (r"\mp", "-+"),
    (r"\approx", "approx"),
    (r"\equiv", "equiv"),
    (r"\partial", "partial"),
    (r"\nabla", "nabla"),
    (r"\rightarrow", "rightarrow"),
    (r"\leftarrow", "leftarrow"),
    (r"\Rightarrow", "Rightarrow"),
    (r"\Leftarrow", "Leftarrow"),
];

/// Delimiter pairs
const DELIMITERS: &[(&str, &str)] = &[
    (r"\left(", "left("),
    (r"\right)", "right)"),
    (r"\left[", "left["),
    (r"\right]", "right]"),
    (r"\left\{", "left lbrace "),
    (r"\right\}", "right rbrace "),
];

/// Convert LaTeX math source to equation script
pub fn latex_to_hwp_script(latex: &str) -> String {
    static FRAC_RE: OnceLock<Regex> = OnceLock::new();
    static SUM_RE: OnceLock<Regex> = OnceLock::new();
    static INT_RE: OnceLock<Regex> = OnceLock::new();
    static SQRT_RE: OnceLock<Regex> = OnceLock::new();
    static COMMAND_RE: OnceLock<Regex> = OnceLock::new();

    let frac = FRAC_RE.get_or_init(|| Regex::new(r"\\frac\{([^}]*)\}\{([^}]*)\}").unwrap());
    let sum = SUM_RE.get_or_init(|| Regex::new(r"\\sum_\{([^}]*)\}\^\{([^}]*)\}").unwrap());
    let int = INT_RE.get_or_init(|| Regex::new(r"\\int_\{([^}]*)\}\^\{([^}]*)\}").unwrap());
    let sqrt = SQRT_RE.get_or_init(|| Regex::new(r"\\sqrt\{([^}]*)\}").unwrap());
    let command = COMMAND_RE.get_or_init(|| Regex::new(r"\\([a-zA-Z]+)").unwrap());

    let s = latex.trim().trim_matches('$');
    let s = frac.replace_all(s, "{${1}} over {${2}}");
    let s = sum.replace_all(&s, "sum from{${1}} to{${2}}");
    let s = int.replace_all(&s, "int from{${1}} to{${2}}");
    let mut s = sqrt.replace_all(&s, "sqrt{${1}}").into_owned();

    for (from, to) in DELIMITERS.iter().chain(SYMBOLS) {
        s = s.replace(from, to);
    }

    command.replace_all(&s, "${1}").into_owned()
}

/// Build a `hp:equation` element for LaTeX source
pub fn equation_xml(latex: &str) -> String {
    format!(
        "<hp:equation version=\"eqEdit\" baseLine=\"0\" textColor=\"#000000\" \
         baseUnit=\"1000\" lineMode=\"0\" font=\"\"><hp:script>{}</hp:script></hp:equation>",
        escape_xml(&latex_to_hwp_script(latex))
    )
}
