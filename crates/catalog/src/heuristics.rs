//! Rule-based enrichment that inspects the caller's code snippet to produce a
//! more specific solution than the canned catalog entry.

use errlens_protocol::{Solution, CONTEXT_SOLUTION_CONFIDENCE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\w+)\b").expect("valid regex"));
static UNDEFINED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"name '(\w+)' is not defined").expect("valid regex"));
static LIST_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*=\s*\[(.*?)\]").expect("valid regex"));

/// Maximum length difference and positional mismatches for a "similar" name.
const MAX_NAME_DISTANCE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFinding {
    pub issue: String,
    pub fix: String,
}

impl ContextFinding {
    pub fn into_solution(self, code_context: &str) -> Solution {
        Solution {
            fix: self.fix,
            explanation: self.issue,
            confidence: CONTEXT_SOLUTION_CONFIDENCE,
            code_example: format!("# Based on your specific code:\n{code_context}"),
        }
    }
}

pub fn analyze_context(
    error_type: &str,
    error_message: &str,
    code_context: &str,
) -> Option<ContextFinding> {
    if code_context.is_empty() {
        return None;
    }
    match error_type {
        "NameError" => undefined_name_typo(error_message, code_context),
        "IndexError" => index_out_of_range(code_context),
        _ => None,
    }
}

fn undefined_name_typo(error_message: &str, code_context: &str) -> Option<ContextFinding> {
    let undefined = UNDEFINED_NAME.captures(error_message)?.get(1)?.as_str();
    let undefined_len = undefined.chars().count();

    let mut seen = HashSet::new();
    let mut similar: Vec<(usize, usize, usize, &str)> = Vec::new();
    for line in code_context.split('\n') {
        for token in WORD.find_iter(line).map(|m| m.as_str()) {
            if !seen.insert(token) || token == undefined {
                continue;
            }
            let len_diff = token.chars().count().abs_diff(undefined_len);
            if len_diff > MAX_NAME_DISTANCE {
                continue;
            }
            let mismatches = positional_mismatches(token, undefined);
            if mismatches <= MAX_NAME_DISTANCE {
                similar.push((mismatches, len_diff, similar.len(), token));
            }
        }
    }
    if similar.is_empty() {
        return None;
    }

    // Closest names first; ties keep their first occurrence in the snippet.
    similar.sort_unstable();
    let names: Vec<&str> = similar.iter().map(|(_, _, _, name)| *name).collect();
    Some(ContextFinding {
        issue: format!("You might have a typo in variable name '{undefined}'"),
        fix: format!(
            "Did you mean '{}'? Similar variables found: {}",
            names[0],
            names.join(", ")
        ),
    })
}

fn positional_mismatches(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).filter(|(x, y)| x != y).count()
}

/// Scans every list literal and subscript; the last out-of-range hit wins.
fn index_out_of_range(code_context: &str) -> Option<ContextFinding> {
    let mut finding = None;
    for literal in LIST_LITERAL.captures_iter(code_context) {
        let name = &literal[1];
        // Comma count is a length estimate only; nested brackets or quoted commas skew it.
        let estimated_len = literal[2].split(',').count();

        let subscript = Regex::new(&format!(r"{}\[(\d+)\]", regex::escape(name))).ok()?;
        for index in subscript.captures_iter(code_context) {
            let raw = &index[1];
            let out_of_range = raw
                .parse::<usize>()
                .map_or(true, |index| index >= estimated_len);
            if out_of_range {
                finding = Some(ContextFinding {
                    issue: format!("Index {raw} is out of range for list '{name}'"),
                    fix: format!(
                        "The list '{name}' appears to have {estimated_len} items (indices 0-{})",
                        estimated_len - 1
                    ),
                });
            }
        }
    }
    finding
}
