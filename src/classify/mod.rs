//! Responsibility classification.
//!
//! A thin decision procedure over the pattern library's ordered rule table.
//! Classification is a total, pure function of the signature: every
//! signature receives exactly one result, and the same signature always
//! receives the same result.

use crate::core::{
    Classification, ClassifiedFunction, ComplexityGrade, FunctionSignature, Responsibility,
    RiskLevel,
};
use crate::patterns::{first_matching_rule, keywords};

/// Classify one signature. See the rule table in [`crate::patterns`] for
/// category and priority assignment; complexity and risk derive from the
/// signature and the chosen category here.
pub fn classify(sig: &FunctionSignature) -> Classification {
    let rule = first_matching_rule(sig);
    Classification {
        responsibility: rule.responsibility,
        complexity: complexity_grade(sig),
        risk: risk_level(rule.responsibility),
        priority: rule.priority,
    }
}

/// Classify a batch, pairing each signature 1:1 with its result.
pub fn classify_all(signatures: Vec<FunctionSignature>) -> Vec<ClassifiedFunction> {
    signatures
        .into_iter()
        .map(|signature| {
            let classification = classify(&signature);
            ClassifiedFunction {
                signature,
                classification,
            }
        })
        .collect()
}

/// Complex when the signature carries an async/callback parameter or an I/O
/// keyword; otherwise simple up to three parameters, medium beyond that.
fn complexity_grade(sig: &FunctionSignature) -> ComplexityGrade {
    if keywords::has_callback_param(sig) || keywords::has_io_keyword(sig) {
        ComplexityGrade::Complex
    } else if sig.params.len() <= 3 {
        ComplexityGrade::Simple
    } else {
        ComplexityGrade::Medium
    }
}

fn risk_level(responsibility: Responsibility) -> RiskLevel {
    match responsibility {
        Responsibility::ParsingEncoding => RiskLevel::High,
        Responsibility::StateManagement => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}
