//! Named, ordered extraction and classification rules.
//!
//! Both tables are plain data: extraction rules pair a regex with the build
//! field it populates, classification rules pair a predicate with the
//! category and priority it asserts. Rule order is significant and fixed;
//! the first matching rule wins on conflict. Matching has no side effects.

pub mod keywords;

use crate::core::{FunctionSignature, Responsibility, TestPriority};
use once_cell::sync::Lazy;
use regex::Regex;

/// Structural field a build-config extraction rule populates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildField {
    ProjectName,
    CppStandard,
    TargetDecl,
    IncludeDirs,
    FindPackage,
}

/// A named extraction rule: pattern descriptor plus target field.
pub struct ExtractionRule {
    pub name: &'static str,
    pub field: BuildField,
    pub pattern: Regex,
}

static EXTRACTION_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule {
            name: "project-name",
            field: BuildField::ProjectName,
            pattern: Regex::new(r"(?im)^\s*project\s*\(\s*(\w+)").unwrap(),
        },
        ExtractionRule {
            name: "cpp-standard",
            field: BuildField::CppStandard,
            pattern: Regex::new(r"CMAKE_CXX_STANDARD\s+(\d+)").unwrap(),
        },
        ExtractionRule {
            name: "target-declaration",
            field: BuildField::TargetDecl,
            pattern: Regex::new(r"(?is)add_(executable|library)\s*\(\s*(\w+)([^)]*)\)").unwrap(),
        },
        ExtractionRule {
            name: "include-directories",
            field: BuildField::IncludeDirs,
            pattern: Regex::new(r"(?is)target_include_directories\s*\(\s*(\w+)([^)]*)\)").unwrap(),
        },
        ExtractionRule {
            name: "find-package",
            field: BuildField::FindPackage,
            pattern: Regex::new(r"(?i)find_package\s*\(\s*(\w+)").unwrap(),
        },
    ]
});

/// Ordered extraction rule table for build-description text.
pub fn extraction_rules() -> &'static [ExtractionRule] {
    &EXTRACTION_RULES
}

/// Look up an extraction rule by name, for targeted use and rule-level tests.
pub fn extraction_rule(name: &str) -> Option<&'static ExtractionRule> {
    EXTRACTION_RULES.iter().find(|r| r.name == name)
}

/// Pure matcher: all capture lists of `rule` in `text`, empty when no match.
pub fn match_rule<'t>(rule: &ExtractionRule, text: &'t str) -> Vec<regex::Captures<'t>> {
    rule.pattern.captures_iter(text).collect()
}

/// A classification rule: predicate over a signature plus the category and
/// priority it asserts when it fires.
pub struct ClassificationRule {
    pub name: &'static str,
    pub applies: fn(&FunctionSignature) -> bool,
    pub responsibility: Responsibility,
    pub priority: TestPriority,
}

fn parsing_keyword(sig: &FunctionSignature) -> bool {
    keywords::name_matches(&sig.name, keywords::PARSING_KEYWORDS)
}

fn raw_buffer_input(sig: &FunctionSignature) -> bool {
    keywords::has_raw_buffer_param(sig)
        && !keywords::has_event_handler_shape(&sig.name)
        && !keywords::name_matches(&sig.name, keywords::CALLBACK_KEYWORDS)
}

fn event_handler(sig: &FunctionSignature) -> bool {
    keywords::has_event_handler_shape(&sig.name)
        || keywords::name_matches(&sig.name, keywords::CALLBACK_KEYWORDS)
}

fn network_io(sig: &FunctionSignature) -> bool {
    keywords::name_matches(&sig.name, keywords::NETWORK_KEYWORDS)
        || keywords::has_callback_param(sig)
}

fn lifecycle(sig: &FunctionSignature) -> bool {
    keywords::name_matches(&sig.name, keywords::LIFECYCLE_KEYWORDS)
}

fn state_transition(sig: &FunctionSignature) -> bool {
    keywords::name_matches(&sig.name, keywords::STATE_KEYWORDS) || keywords::has_state_param(sig)
}

fn pure_utility(sig: &FunctionSignature) -> bool {
    !keywords::name_matches(&sig.name, keywords::SIDE_EFFECT_KEYWORDS)
}

fn always(_sig: &FunctionSignature) -> bool {
    true
}

/// The fixed-order decision table. Earlier rules take precedence; the final
/// catch-all makes classification total. The event-handler rule deliberately
/// precedes the network rule so `onDataReceived` lands in callback-event
/// rather than network-io, and the raw-buffer rule excludes handler-shaped
/// names for the same reason.
static CLASSIFICATION_RULES: Lazy<Vec<ClassificationRule>> = Lazy::new(|| {
    vec![
        ClassificationRule {
            name: "parsing-keyword",
            applies: parsing_keyword,
            responsibility: Responsibility::ParsingEncoding,
            priority: TestPriority::P0,
        },
        ClassificationRule {
            name: "raw-buffer-input",
            applies: raw_buffer_input,
            responsibility: Responsibility::ParsingEncoding,
            priority: TestPriority::P0,
        },
        ClassificationRule {
            name: "event-handler",
            applies: event_handler,
            responsibility: Responsibility::CallbackEvent,
            priority: TestPriority::P1,
        },
        ClassificationRule {
            name: "network-io",
            applies: network_io,
            responsibility: Responsibility::NetworkIo,
            priority: TestPriority::P2,
        },
        ClassificationRule {
            name: "lifecycle",
            applies: lifecycle,
            responsibility: Responsibility::Lifecycle,
            priority: TestPriority::P1,
        },
        ClassificationRule {
            name: "state-transition",
            applies: state_transition,
            responsibility: Responsibility::StateManagement,
            priority: TestPriority::P1,
        },
        ClassificationRule {
            name: "pure-utility",
            applies: pure_utility,
            responsibility: Responsibility::UtilityConversion,
            priority: TestPriority::P3,
        },
        ClassificationRule {
            name: "unclassified",
            applies: always,
            responsibility: Responsibility::Unclassified,
            priority: TestPriority::P3,
        },
    ]
});

/// Ordered classification rule table; the last rule always applies.
pub fn classification_rules() -> &'static [ClassificationRule] {
    &CLASSIFICATION_RULES
}

/// First rule whose predicate holds. Total because of the catch-all.
pub fn first_matching_rule(sig: &FunctionSignature) -> &'static ClassificationRule {
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| (rule.applies)(sig))
        .expect("classification table ends with a catch-all rule")
}
