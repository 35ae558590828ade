//! Request validation against declarative schemas.
//!
//! A schema is an ordered table of fields, each with an ordered list of
//! rules. Every violated rule contributes its message, in table order.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use validator::ValidateEmail;

lazy_static! {
    // Letters (including Latin-1 accented) separated by single spaces.
    static ref LETTERS_AND_SPACES: Regex =
        Regex::new(r"^[A-Za-zÀ-ÿ]+(?: [A-Za-zÀ-ÿ]+)*$").expect("valid full name pattern");

    // Top-level domain: two or more letters, or a punycode label.
    static ref TOP_LEVEL_DOMAIN: Regex =
        Regex::new(r"(?i)^(?:\p{L}{2,}|xn--[a-z0-9-]{2,})$").expect("valid tld pattern");
}

/// Dotted domain ending in a real top-level domain. Bare hosts
/// (`user@localhost`) and IP literals (`x@[127.0.0.1]`) are rejected.
fn has_public_domain(s: &str) -> bool {
    let Some((_, domain)) = s.rsplit_once('@') else {
        return false;
    };
    if domain.starts_with('[') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && TOP_LEVEL_DOMAIN.is_match(tld),
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required(&'static str),
    Email(&'static str),
    LettersAndSpaces(&'static str),
    MinLength(usize, &'static str),
    MaxLength(usize, &'static str),
}

impl Rule {
    pub fn message(&self) -> &'static str {
        match self {
            Rule::Required(msg)
            | Rule::Email(msg)
            | Rule::LettersAndSpaces(msg)
            | Rule::MinLength(_, msg)
            | Rule::MaxLength(_, msg) => *msg,
        }
    }

    /// Rules other than `Required` only accept strings; a missing or
    /// non-string value violates them.
    fn is_satisfied_by(&self, value: Option<&Value>) -> bool {
        match self {
            Rule::Required(_) => match value {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
            _ => {
                let Some(Value::String(s)) = value else {
                    return false;
                };
                match self {
                    Rule::Email(_) => s.validate_email() && has_public_domain(s),
                    Rule::LettersAndSpaces(_) => LETTERS_AND_SPACES.is_match(s),
                    Rule::MinLength(min, _) => s.chars().count() >= *min,
                    Rule::MaxLength(max, _) => s.chars().count() <= *max,
                    Rule::Required(_) => true,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

const EMAIL_RULES: &[Rule] = &[
    Rule::Required("Email is required"),
    Rule::Email("Email must be a valid email address"),
];

const PASSWORD_RULES: &[Rule] = &[
    Rule::Required("Password is required"),
    Rule::MinLength(6, "Password must be at least 6 characters long"),
    Rule::MaxLength(32, "Password must be at most 32 characters long"),
];

const FULL_NAME_RULES: &[Rule] = &[
    Rule::Required("Full name is required"),
    Rule::LettersAndSpaces("Full name must contain only letters and valid spaces between words"),
    Rule::MinLength(4, "Full name must be at least 4 characters long"),
    Rule::MaxLength(50, "Full name must be at most 50 characters long"),
];

const CREATE_USER: &[FieldRules] = &[
    FieldRules { field: "email", rules: EMAIL_RULES },
    FieldRules { field: "fullName", rules: FULL_NAME_RULES },
    FieldRules { field: "password", rules: PASSWORD_RULES },
];

const LOGIN_USER: &[FieldRules] = &[
    FieldRules { field: "email", rules: EMAIL_RULES },
    FieldRules { field: "password", rules: PASSWORD_RULES },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    CreateUser,
    LoginUser,
}

impl Schema {
    pub fn name(&self) -> &'static str {
        match self {
            Schema::CreateUser => "CreateUser",
            Schema::LoginUser => "LoginUser",
        }
    }

    pub fn fields(&self) -> &'static [FieldRules] {
        match self {
            Schema::CreateUser => CREATE_USER,
            Schema::LoginUser => LOGIN_USER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(Vec<String>),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

pub fn validate(schema: Schema, payload: &Value) -> ValidationOutcome {
    let messages: Vec<String> = schema
        .fields()
        .iter()
        .flat_map(|field| {
            let value = payload.get(field.field);
            field
                .rules
                .iter()
                .filter(move |rule| !rule.is_satisfied_by(value))
                .map(|rule| rule.message().to_string())
        })
        .collect();

    if messages.is_empty() {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Invalid(messages)
    }
}
