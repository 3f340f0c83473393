use crate::error::{CatalogError, Result};
use errlens_protocol::Solution;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
pub struct SolutionSpec {
    pub fix: &'static str,
    pub explanation: &'static str,
    pub confidence: f64,
    pub code_example: &'static str,
}

impl SolutionSpec {
    fn to_solution(self) -> Solution {
        Solution {
            fix: self.fix.to_string(),
            explanation: self.explanation.to_string(),
            confidence: self.confidence,
            code_example: self.code_example.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntrySpec {
    pub label: &'static str,
    pub pattern: &'static str,
    pub solutions: &'static [SolutionSpec],
    pub concepts: &'static [&'static str],
}

#[derive(Debug)]
pub struct PatternEntry {
    label: &'static str,
    regex: Regex,
    solutions: &'static [SolutionSpec],
    concepts: &'static [&'static str],
}

impl PatternEntry {
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_match(&self, message: &str) -> bool {
        self.regex.is_match(message)
    }

    pub fn solutions(&self) -> Vec<Solution> {
        self.solutions.iter().map(|spec| spec.to_solution()).collect()
    }

    pub fn concepts(&self) -> Vec<String> {
        self.concepts.iter().map(|c| (*c).to_string()).collect()
    }
}

/// Ordered error pattern table. Declaration order is precedence: the first
/// entry whose regex matches anywhere in the message wins.
#[derive(Debug)]
pub struct PatternCatalog {
    entries: Vec<PatternEntry>,
}

static BUILTIN: Lazy<PatternCatalog> = Lazy::new(|| {
    PatternCatalog::from_specs(BUILTIN_SPECS).expect("built-in pattern catalog is valid")
});

impl PatternCatalog {
    pub fn builtin() -> &'static PatternCatalog {
        &BUILTIN
    }

    pub fn from_specs(specs: &[EntrySpec]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            if !seen.insert(spec.label) {
                return Err(CatalogError::DuplicateLabel(spec.label.to_string()));
            }
            if spec.solutions.is_empty() {
                return Err(CatalogError::NoSolutions(spec.label.to_string()));
            }
            let regex = Regex::new(spec.pattern).map_err(|source| CatalogError::InvalidPattern {
                label: spec.label.to_string(),
                source,
            })?;
            entries.push(PatternEntry {
                label: spec.label,
                regex,
                solutions: spec.solutions,
                concepts: spec.concepts,
            });
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn match_message(&self, message: &str) -> Option<&PatternEntry> {
        let hit = self.entries.iter().find(|entry| entry.is_match(message));
        match hit {
            Some(entry) => log::debug!("Catalog match: {}", entry.label),
            None => log::debug!("No catalog pattern matched"),
        }
        hit
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(PatternEntry::label).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub const BUILTIN_SPECS: &[EntrySpec] = &[
    EntrySpec {
        label: "NameError",
        pattern: r"name '(\w+)' is not defined",
        solutions: &[SolutionSpec {
            fix: "Define the variable before using it",
            explanation: "This error occurs when you try to use a variable that hasn't been defined yet.",
            confidence: 0.9,
            code_example: r#"
# Wrong
print(undefined_variable)

# Correct
undefined_variable = 'some value'
print(undefined_variable)
"#,
        }],
        concepts: &["variable scope", "variable declaration"],
    },
    EntrySpec {
        label: "TypeError",
        pattern: r"unsupported operand type\(s\) for (\+|-|\*|/): '(\w+)' and '(\w+)'",
        solutions: &[SolutionSpec {
            fix: "Convert variables to compatible types before operation",
            explanation: "This error occurs when you try to perform operations on incompatible types.",
            confidence: 0.85,
            code_example: r#"
# Wrong
result = "123" + 456

# Correct
result = int("123") + 456  # If you want a number
# OR
result = "123" + str(456)  # If you want a string
"#,
        }],
        concepts: &["type conversion", "operators"],
    },
    EntrySpec {
        label: "IndexError",
        pattern: r"list index out of range",
        solutions: &[SolutionSpec {
            fix: "Check that the index is within the bounds of the list",
            explanation: "This error occurs when you try to access an index that doesn't exist in the list.",
            confidence: 0.95,
            code_example: r#"
# Wrong
my_list = [1, 2, 3]
print(my_list[3])  # Index 3 doesn't exist

# Correct
my_list = [1, 2, 3]
if len(my_list) > 3:
    print(my_list[3])
else:
    print("Index out of range")
"#,
        }],
        concepts: &["lists", "indexing", "bounds checking"],
    },
    EntrySpec {
        label: "KeyError",
        pattern: r"KeyError: '(\w+)'",
        solutions: &[SolutionSpec {
            fix: "Check if the key exists before accessing it",
            explanation: "This error occurs when you try to access a dictionary with a key that doesn't exist.",
            confidence: 0.9,
            code_example: r#"
# Wrong
my_dict = {'a': 1, 'b': 2}
print(my_dict['c'])

# Correct
my_dict = {'a': 1, 'b': 2}
if 'c' in my_dict:
    print(my_dict['c'])
else:
    print("Key doesn't exist")
    
# Alternative using .get()
print(my_dict.get('c', 'Key doesn't exist'))
"#,
        }],
        concepts: &["dictionaries", "key validation", "default values"],
    },
    EntrySpec {
        label: "SyntaxError",
        pattern: r"SyntaxError: invalid syntax",
        solutions: &[SolutionSpec {
            fix: "Check your code for syntax errors",
            explanation: "This generic syntax error occurs when Python can't parse your code.",
            confidence: 0.7,
            code_example: r#"
# Common syntax errors:

# 1. Missing closing parenthesis
print("Hello"

# 2. Missing colons after if/for/while statements
if x > 5
    print(x)

# 3. Incorrect indentation
if x > 5:
print(x)
"#,
        }],
        concepts: &["syntax", "code structure", "indentation"],
    },
    EntrySpec {
        label: "IndentationError",
        pattern: r"IndentationError: (unexpected indent|expected an indented block)",
        solutions: &[SolutionSpec {
            fix: "Fix your code's indentation",
            explanation: "This error occurs when your code has inconsistent indentation.",
            confidence: 0.9,
            code_example: r#"
# Wrong
if x > 5:
print("x is greater than 5")  # Missing indentation

# Correct
if x > 5:
    print("x is greater than 5")  # Properly indented
"#,
        }],
        concepts: &["indentation", "code blocks", "Python syntax"],
    },
    EntrySpec {
        label: "ImportError",
        pattern: r"ImportError: No module named '(\w+)'",
        solutions: &[SolutionSpec {
            fix: "Install the missing module or check the import statement",
            explanation: "This error occurs when Python can't find the module you're trying to import.",
            confidence: 0.85,
            code_example: r#"
# Error
import non_existent_module

# Fix: Install the module
# pip install module_name

# Or check if you misspelled the module name
import os  # instead of 'Os' or 'OS'
"#,
        }],
        concepts: &["imports", "modules", "package management"],
    },
    EntrySpec {
        label: "AttributeError",
        pattern: r"AttributeError: '(\w+)' object has no attribute '(\w+)'",
        solutions: &[SolutionSpec {
            fix: "Check if the object has the attribute you're trying to access",
            explanation: "This error occurs when you try to access an attribute or method that doesn't exist for that object.",
            confidence: 0.85,
            code_example: r#"
# Wrong
x = 5
x.append(10)  # integers don't have an append method

# Correct
# Check the object type first
x = 5
if hasattr(x, 'append'):
    x.append(10)
else:
    print("This object doesn't have an append method")
"#,
        }],
        concepts: &["object attributes", "methods", "type checking"],
    },
    EntrySpec {
        label: "ZeroDivisionError",
        pattern: r"ZeroDivisionError: division by zero",
        solutions: &[SolutionSpec {
            fix: "Check for zero before dividing",
            explanation: "This error occurs when you try to divide by zero.",
            confidence: 0.95,
            code_example: r#"
# Wrong
x = 10 / 0

# Correct
denominator = 0
if denominator != 0:
    result = 10 / denominator
else:
    result = "Cannot divide by zero"
"#,
        }],
        concepts: &["division", "error checking", "defensive programming"],
    },
    EntrySpec {
        label: "ValueError",
        pattern: r"ValueError: invalid literal for int\(\) with base 10: '(\w+)'",
        solutions: &[SolutionSpec {
            fix: "Ensure the string can be converted to an integer",
            explanation: "This error occurs when you try to convert a string to an integer, but the string doesn't represent a valid integer.",
            confidence: 0.9,
            code_example: r#"
# Wrong
int("abc")

# Correct
user_input = "abc"
try:
    number = int(user_input)
except ValueError:
    print("Input must be a valid integer")
    number = 0  # default value
"#,
        }],
        concepts: &["type conversion", "input validation", "exception handling"],
    },
];
