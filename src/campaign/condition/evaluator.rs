//! Condition expression evaluator

use std::cmp::Ordering;
use std::collections::HashMap;

use super::ast::{CompareOp, ConditionValuePair, Expression, Literal};
use crate::campaign::prompt::parse_timestamp;
use crate::campaign::response::{PromptResponse, ResponseValue};

/// Read access to the responses collected so far in a submission
pub trait ResponseLookup {
    /// The response to the given prompt, if it has been reached
    fn response(&self, prompt_id: &str) -> Option<&PromptResponse>;
}

impl ResponseLookup for HashMap<String, PromptResponse> {
    fn response(&self, prompt_id: &str) -> Option<&PromptResponse> {
        self.get(prompt_id)
    }
}

/// Evaluate a condition against the responses collected so far.
///
/// `and`/`or` short-circuit left to right.
pub fn evaluate<L: ResponseLookup + ?Sized>(expr: &Expression, responses: &L) -> bool {
    match expr {
        Expression::Compare(pair) => evaluate_pair(pair, responses),
        Expression::And(operands) => operands.iter().all(|e| evaluate(e, responses)),
        Expression::Or(operands) => operands.iter().any(|e| evaluate(e, responses)),
    }
}

fn evaluate_pair<L: ResponseLookup + ?Sized>(pair: &ConditionValuePair, responses: &L) -> bool {
    // Not reached yet: the condition cannot be satisfied
    let Some(response) = responses.response(&pair.prompt_id) else {
        return false;
    };
    compare(response.value(), pair.op, &pair.value)
}

fn compare(value: &ResponseValue, op: CompareOp, literal: &Literal) -> bool {
    match (value, literal) {
        (ResponseValue::NoResponse(actual), Literal::NoResponse(expected)) => match op {
            CompareOp::Eq => actual == expected,
            CompareOp::NotEq => actual != expected,
            _ => false,
        },
        (ResponseValue::NoResponse(_), _) => false,
        // A real answer never equals a no-response
        (_, Literal::NoResponse(_)) => op == CompareOp::NotEq,
        (ResponseValue::Number(n), Literal::Number(rn)) => compare_numbers(*n, *rn, op),
        (ResponseValue::Text(s), Literal::Text(rs)) => op.holds(s.as_str().cmp(rs.as_str())),
        (ResponseValue::Timestamp(ts), Literal::Text(rs)) => match parse_timestamp(rs) {
            Some(other) => op.holds(ts.cmp(&other)),
            None => false,
        },
        _ => false,
    }
}

fn compare_numbers(left: f64, right: f64, op: CompareOp) -> bool {
    if (left - right).abs() < f64::EPSILON {
        return op.holds(Ordering::Equal);
    }
    left.partial_cmp(&right)
        .map(|ordering| op.holds(ordering))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::condition::parser::parse;
    use crate::campaign::prompt::{NumberPrompt, Prompt, PromptKind, TextPrompt, TimestampPrompt};
    use crate::campaign::response::NoResponse;
    use chrono::DateTime;
    use std::sync::Arc;

    fn respond(id: &str, kind: PromptKind, value: ResponseValue) -> (String, PromptResponse) {
        let prompt = Arc::new(Prompt::new(id, "?", kind));
        let response = PromptResponse::new(prompt, None, value).unwrap();
        (id.to_string(), response)
    }

    fn number(id: &str, n: f64) -> (String, PromptResponse) {
        respond(
            id,
            PromptKind::Number(NumberPrompt::default()),
            ResponseValue::Number(n),
        )
    }

    fn text(id: &str, s: &str) -> (String, PromptResponse) {
        respond(
            id,
            PromptKind::Text(TextPrompt::default()),
            ResponseValue::Text(s.to_string()),
        )
    }

    fn no_response(id: &str, nr: NoResponse) -> (String, PromptResponse) {
        respond(
            id,
            PromptKind::Number(NumberPrompt::default()),
            ResponseValue::NoResponse(nr),
        )
    }

    fn context_with(pairs: Vec<(String, PromptResponse)>) -> HashMap<String, PromptResponse> {
        pairs.into_iter().collect()
    }

    /// Panics if the given prompt is looked up
    struct Tripwire<'a> {
        inner: &'a HashMap<String, PromptResponse>,
        forbidden: &'a str,
    }

    impl ResponseLookup for Tripwire<'_> {
        fn response(&self, prompt_id: &str) -> Option<&PromptResponse> {
            if prompt_id == self.forbidden {
                panic!("prompt '{}' must not be consulted", prompt_id);
            }
            self.inner.get(prompt_id)
        }
    }

    #[test]
    fn test_number_equality() {
        let ctx = context_with(vec![number("P1", 5.0)]);
        assert!(evaluate(&parse("P1 == 5").unwrap(), &ctx));
        assert!(!evaluate(&parse("P1 == 6").unwrap(), &ctx));
        assert!(evaluate(&parse("P1 != 6").unwrap(), &ctx));
    }

    #[test]
    fn test_number_ordering() {
        let ctx = context_with(vec![number("score", 7.5)]);

        assert!(evaluate(&parse("score > 5").unwrap(), &ctx));
        assert!(!evaluate(&parse("score > 10").unwrap(), &ctx));

        assert!(evaluate(&parse("score >= 7.5").unwrap(), &ctx));
        assert!(!evaluate(&parse("score >= 8").unwrap(), &ctx));

        assert!(evaluate(&parse("score < 10").unwrap(), &ctx));
        assert!(!evaluate(&parse("score < 5").unwrap(), &ctx));

        assert!(evaluate(&parse("score <= 7.5").unwrap(), &ctx));
        assert!(!evaluate(&parse("score <= 7").unwrap(), &ctx));
    }

    #[test]
    fn test_text_lexicographic() {
        let ctx = context_with(vec![text("drink", "coffee")]);

        assert!(evaluate(&parse("drink == 'coffee'").unwrap(), &ctx));
        assert!(evaluate(&parse("drink == coffee").unwrap(), &ctx));
        assert!(!evaluate(&parse("drink == 'tea'").unwrap(), &ctx));
        assert!(evaluate(&parse("drink < 'tea'").unwrap(), &ctx));
        assert!(evaluate(&parse("drink > 'beer'").unwrap(), &ctx));
    }

    #[test]
    fn test_timestamp_ordering() {
        let ts = DateTime::parse_from_rfc3339("2012-05-01T10:00:00-07:00").unwrap();
        let ctx = context_with(vec![respond(
            "woke",
            PromptKind::Timestamp(TimestampPrompt),
            ResponseValue::Timestamp(ts),
        )]);

        // Same instant written in UTC
        assert!(evaluate(&parse("woke == '2012-05-01T17:00:00Z'").unwrap(), &ctx));
        assert!(evaluate(&parse("woke > '2012-05-01'").unwrap(), &ctx));
        assert!(!evaluate(&parse("woke > '2012-05-02'").unwrap(), &ctx));
        assert!(!evaluate(&parse("woke == 'yesterday'").unwrap(), &ctx));
    }

    #[test]
    fn test_missing_prompt_is_false() {
        let ctx = context_with(vec![]);

        assert!(!evaluate(&parse("missing == 5").unwrap(), &ctx));
        assert!(!evaluate(&parse("missing != 5").unwrap(), &ctx));
        assert!(!evaluate(&parse("missing == SKIPPED").unwrap(), &ctx));
        assert!(!evaluate(&parse("missing != SKIPPED").unwrap(), &ctx));
    }

    #[test]
    fn test_no_response_comparisons() {
        let ctx = context_with(vec![no_response("sleep", NoResponse::Skipped)]);

        assert!(evaluate(&parse("sleep == SKIPPED").unwrap(), &ctx));
        assert!(!evaluate(&parse("sleep != SKIPPED").unwrap(), &ctx));
        assert!(evaluate(&parse("sleep != NOT_DISPLAYED").unwrap(), &ctx));
        assert!(!evaluate(&parse("sleep == NOT_DISPLAYED").unwrap(), &ctx));

        // Against real values every operator is false
        assert!(!evaluate(&parse("sleep == 5").unwrap(), &ctx));
        assert!(!evaluate(&parse("sleep != 5").unwrap(), &ctx));
        assert!(!evaluate(&parse("sleep > 5").unwrap(), &ctx));
    }

    #[test]
    fn test_ordering_against_no_response_literal_is_false() {
        let ctx = context_with(vec![no_response("sleep", NoResponse::Skipped)]);
        assert!(!evaluate(&parse("sleep > SKIPPED").unwrap(), &ctx));
        assert!(!evaluate(&parse("sleep <= SKIPPED").unwrap(), &ctx));
    }

    #[test]
    fn test_real_value_against_no_response_literal() {
        let ctx = context_with(vec![number("cups", 2.0)]);
        assert!(!evaluate(&parse("cups == SKIPPED").unwrap(), &ctx));
        assert!(evaluate(&parse("cups != SKIPPED").unwrap(), &ctx));
        assert!(!evaluate(&parse("cups >= SKIPPED").unwrap(), &ctx));
    }

    #[test]
    fn test_mismatched_kinds_are_false() {
        let ctx = context_with(vec![number("cups", 2.0), text("drink", "2")]);
        assert!(!evaluate(&parse("cups == '2'").unwrap(), &ctx));
        assert!(!evaluate(&parse("drink == 2").unwrap(), &ctx));
    }

    #[test]
    fn test_and_or() {
        let ctx = context_with(vec![text("intent", "code"), number("confidence", 0.9)]);

        assert!(evaluate(
            &parse("intent == 'code' and confidence > 0.8").unwrap(),
            &ctx
        ));
        assert!(!evaluate(
            &parse("intent == 'code' and confidence > 0.95").unwrap(),
            &ctx
        ));
        assert!(evaluate(
            &parse("intent == 'search' or confidence > 0.8").unwrap(),
            &ctx
        ));
        assert!(!evaluate(
            &parse("intent == 'search' or confidence > 0.95").unwrap(),
            &ctx
        ));
    }

    #[test]
    fn test_and_short_circuits() {
        let ctx = context_with(vec![number("a", 1.0), number("b", 1.0)]);
        let guarded = Tripwire {
            inner: &ctx,
            forbidden: "b",
        };
        assert!(!evaluate(&parse("a == 2 and b == 1").unwrap(), &guarded));
    }

    #[test]
    fn test_or_short_circuits() {
        let ctx = context_with(vec![number("a", 1.0)]);
        let guarded = Tripwire {
            inner: &ctx,
            forbidden: "b",
        };
        assert!(evaluate(&parse("a == 1 or b == 1").unwrap(), &guarded));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let ctx = context_with(vec![number("P1", 5.0)]);
        let expr = parse("P1 == 5 or P2 == 1").unwrap();
        assert_eq!(evaluate(&expr, &ctx), evaluate(&expr, &ctx));
    }

    #[test]
    fn test_long_chains_evaluate() {
        let ctx = context_with(vec![number("a", 1.0), number("b", 2.0)]);

        let all_true = vec!["a == 1"; 60_000].join(" and ");
        assert!(evaluate(&parse(&all_true).unwrap(), &ctx));

        let mut last_matches = vec!["a == 2"; 60_000];
        last_matches.push("b == 2");
        assert!(evaluate(&parse(&last_matches.join(" or ")).unwrap(), &ctx));
        assert!(!evaluate(&parse(&last_matches[..60_000].join(" or ")).unwrap(), &ctx));
    }
}
