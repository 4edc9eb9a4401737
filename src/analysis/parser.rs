//! Structured-output parser.
//!
//! Models often wrap JSON in prose or code fences. The object is sliced from
//! the first `{` to the last `}` and decoded strictly into the target schema.

use super::schema::Structured;
use crate::core::truncate_graphemes;
use crate::error::AgentError;

/// Raw content kept on parse errors.
const MAX_ERROR_CONTENT: usize = 500;

/// Returns the slice from the first `{` to the last `}`, if any.
#[must_use]
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Decodes and validates a structured response.
///
/// # Errors
///
/// Returns [`AgentError::ResponseParse`] when no object is present, the
/// object does not match the schema, or a range check fails.
pub fn parse_structured<T: Structured>(raw: &str) -> Result<T, AgentError> {
    let parse_error = |message: String| AgentError::ResponseParse {
        message,
        content: truncate_graphemes(raw, MAX_ERROR_CONTENT),
    };

    let json = extract_json_object(raw)
        .ok_or_else(|| parse_error(format!("no JSON object in {} response", T::SCHEMA)))?;

    let value: T = serde_json::from_str(json)
        .map_err(|e| parse_error(format!("invalid {} response: {e}", T::SCHEMA)))?;

    value
        .validate()
        .map_err(|e| parse_error(format!("invalid {} response: {e}", T::SCHEMA)))?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema::{
        ClauseType, ComplianceAnalysis, ComplianceLevel, MetadataExtraction, RiskAnalysis,
    };
    use crate::core::RiskLevel;

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object("x {\"a\":1} y"), Some("{\"a\":1}"));
        assert_eq!(extract_json_object("no braces"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_risk_in_code_fence() {
        let raw = "Here is the analysis:\n```json\n{\"risk_level\":\"high\",\"confidence\":88,\
                   \"explanation\":\"Uncapped.\",\"key_risks\":[\"Unlimited liability\"],\
                   \"recommendations\":[\"Add a cap\"],\"clause_type\":\"liability\"}\n```";
        let risk: RiskAnalysis = parse_structured(raw).unwrap_or_else(|_| unreachable!());
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert_eq!(risk.confidence, 88);
        assert_eq!(risk.clause_type, ClauseType::Liability);
    }

    #[test]
    fn test_parse_rejects_out_of_schema_enum() {
        let raw = r#"{"risk_level":"severe","confidence":50,"explanation":"","key_risks":[],
                     "recommendations":[],"clause_type":"general"}"#;
        let err = parse_structured::<RiskAnalysis>(raw);
        assert!(matches!(err, Err(AgentError::ResponseParse { .. })));
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let raw = r#"{"risk_level":"low","confidence":50}"#;
        assert!(parse_structured::<RiskAnalysis>(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_score() {
        let raw = r#"{"overall_score":150,"frameworks":{}}"#;
        match parse_structured::<ComplianceAnalysis>(raw) {
            Err(AgentError::ResponseParse { message, content }) => {
                assert!(message.contains("overall_score"));
                assert_eq!(content, raw);
            }
            other => unreachable!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_mock_risk_survives_parse() {
        let original = crate::analysis::mock::risk("The Client shall indemnify the Provider.");
        let raw = serde_json::to_string(&original).unwrap_or_default();
        let parsed: RiskAnalysis = parse_structured(&raw).unwrap_or_else(|_| unreachable!());
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_no_object() {
        let err = parse_structured::<MetadataExtraction>("I cannot help with that.");
        assert!(matches!(err, Err(AgentError::ResponseParse { .. })));
    }

    #[test]
    fn test_parse_compliance() {
        let raw = r#"{"overall_score":60,"frameworks":{"GDPR":{"compliance_level":"Non-Compliant",
                     "issues":["No DPA"],"recommendations":["Sign a DPA"]}}}"#;
        let parsed: ComplianceAnalysis = parse_structured(raw).unwrap_or_else(|_| unreachable!());
        assert_eq!(
            parsed.frameworks["GDPR"].compliance_level,
            ComplianceLevel::NonCompliant
        );
    }
}
